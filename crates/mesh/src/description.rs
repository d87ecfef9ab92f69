use crate::geometry::{Corner, Face, Vector3, Vertex};
use crate::vertex_buffer::VertexBuffer;

/// The pool a face index refers to.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Pool {
    Position,
    Normal,
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pool::Position => write!(f, "position"),
            Pool::Normal => write!(f, "normal"),
        }
    }
}

/// A face referenced an element that does not exist in its pool.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("face {face} corner {corner}: {pool} index {index} is out of range 1..={len}")]
pub struct IndexError {
    pub face: usize,
    pub corner: usize,
    pub pool: Pool,
    pub index: u32,
    pub len: usize,
}

/// Resolves a 1-based index into a pool.
pub fn resolve(pool: &[Vector3], index: u32) -> Option<Vector3> {
    let i = (index as usize).checked_sub(1)?;
    pool.get(i).copied()
}

/// Raw geometry of a face-based mesh.
///
/// Positions and normals are stored once each and faces refer to them by
/// (1-based) index, exactly as in the source format. Faces may mix any
/// position with any normal, which is why compiling expands every corner into
/// its own vertex instead of building an index buffer.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct MeshDescription {
    pub positions: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    pub faces: Vec<Face>,
}

impl MeshDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Checks a corner against the pools as they currently are.
    pub fn check_corner(&self, corner: &Corner) -> Result<(), (Pool, u32, usize)> {
        if resolve(&self.positions, corner.position).is_none() {
            return Err((Pool::Position, corner.position, self.positions.len()));
        }
        if resolve(&self.normals, corner.normal).is_none() {
            return Err((Pool::Normal, corner.normal, self.normals.len()));
        }
        Ok(())
    }

    /// Expands every face into 3 vertices, in face order and then corner
    /// order.
    ///
    /// Either the whole mesh compiles or nothing is produced.
    pub fn compile(&self) -> Result<VertexBuffer, IndexError> {
        let mut vertices = Vec::with_capacity(self.faces.len() * 3);
        for (face, f) in self.faces.iter().enumerate() {
            for (corner, c) in f.corners.iter().enumerate() {
                if let Err((pool, index, len)) = self.check_corner(c) {
                    return Err(IndexError {
                        face,
                        corner,
                        pool,
                        index,
                        len,
                    });
                }
                vertices.push(Vertex::new(
                    self.positions[c.position as usize - 1],
                    self.normals[c.normal as usize - 1],
                ));
            }
        }
        // 3 vertices were pushed for every face, so this is always whole triangles.
        Ok(VertexBuffer::from_vertices(vertices).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_one_based() {
        let pool = [Vector3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)];
        assert_eq!(None, resolve(&pool, 0));
        assert_eq!(Some(pool[0]), resolve(&pool, 1));
        assert_eq!(Some(pool[1]), resolve(&pool, 2));
        assert_eq!(None, resolve(&pool, 3));
    }
}
