pub type Vector3 = cgmath::Vector3<f32>;

// We rely on Vector3 being repr(c).
static_assertions::assert_eq_size!(Vector3, [f32; 3]);
static_assertions::assert_eq_align!(Vector3, f32);

/// Number of `f32` values a single vertex occupies once interleaved.
pub const FLOATS_PER_VERTEX: usize = 6;

/// A single interleaved vertex: position followed by normal.
///
/// This is the exact layout the GPU consumes, so the vertex buffer can be
/// handed to the graphics API without any further conversion.
#[repr(C)]
#[derive(Debug, PartialEq, Copy, Clone, Default, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

static_assertions::assert_eq_size!(Vertex, [f32; FLOATS_PER_VERTEX]);
static_assertions::assert_eq_align!(Vertex, f32);

impl Vertex {
    pub fn new(position: Vector3, normal: Vector3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }

    pub fn position(&self) -> Vector3 {
        self.position.into()
    }

    pub fn normal(&self) -> Vector3 {
        self.normal.into()
    }
}

/// One corner of a face, as written in the source format.
///
/// Both indices are 1-based and refer to the position and normal pools of a
/// [`crate::MeshDescription`].
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Corner {
    pub position: u32,
    pub normal: u32,
}

impl Corner {
    pub fn new(position: u32, normal: u32) -> Self {
        Self { position, normal }
    }
}

/// A triangular face. Corner order is the winding order.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Face {
    pub corners: [Corner; 3],
}

impl Face {
    pub fn new(c0: Corner, c1: Corner, c2: Corner) -> Self {
        Self {
            corners: [c0, c1, c2],
        }
    }
}
