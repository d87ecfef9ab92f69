mod camera;
mod controller;
mod frame;

pub use camera::*;
pub use controller::*;
pub use frame::*;
