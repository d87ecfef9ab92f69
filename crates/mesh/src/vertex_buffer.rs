use crate::geometry::{Vertex, FLOATS_PER_VERTEX};

/// A flat, non-indexed stream of interleaved vertices.
///
/// Every consecutive group of 3 vertices is one triangle. The buffer cannot be
/// modified once built; consumers only ever get shared views of it.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct VertexBuffer {
    vertices: Vec<Vertex>,
}

impl VertexBuffer {
    /// Wraps an already expanded list of vertices.
    ///
    /// Returns `None` if the vertices do not form whole triangles.
    pub fn from_vertices(vertices: Vec<Vertex>) -> Option<Self> {
        if vertices.len() % 3 != 0 {
            return None;
        }
        Some(Self { vertices })
    }

    /// Returns the number of vertices, always a multiple of 3.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The buffer as a flat list of floats, 6 per vertex.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn into_inner(self) -> Vec<Vertex> {
        self.vertices
    }
}

/// Builds a [`VertexBuffer`] from a flat float slice (6 floats per vertex).
///
/// Returns `None` if the slice does not describe whole triangles.
pub fn vertex_buffer_from_floats(floats: &[f32]) -> Option<VertexBuffer> {
    if floats.len() % (3 * FLOATS_PER_VERTEX) != 0 {
        return None;
    }
    let vertices = floats
        .chunks_exact(FLOATS_PER_VERTEX)
        .map(|c| Vertex {
            position: [c[0], c[1], c[2]],
            normal: [c[3], c[4], c[5]],
        })
        .collect();
    VertexBuffer::from_vertices(vertices)
}
