mod description;
mod geometry;
mod vertex_buffer;

pub use description::*;
pub use geometry::*;
pub use vertex_buffer::*;
