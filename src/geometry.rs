//! CPU-side geometry before GPU upload.
//!
//! [`RawGeometry`] holds the vertex positions and, for indexed meshes, the triangle
//! index list. It is validated once in [`SetupContext::add_mesh`](crate::SetupContext::add_mesh)
//! and then uploaded into a static [`Mesh`](crate::Mesh).
//!
//! The two flat primitives used by the grid demo live here as well:
//!
//! | Primitive          | Vertices | Draw         |
//! |--------------------|----------|--------------|
//! | [`RawGeometry::triangle`] | 3 | non-indexed |
//! | [`RawGeometry::square`]   | 4 | indexed, two triangles in strip order |

use crate::mesh::Vertex;

/// Errors reported by [`RawGeometry::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("geometry has no vertices")]
    Empty,

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("element count {0} is not a multiple of three")]
    NotTriangles(usize),
}

/// Vertex positions plus optional triangle indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex>,
    /// `None` draws `vertices` directly as a triangle list.
    pub indices: Option<Vec<u32>>,
}

impl RawGeometry {
    /// Non-indexed geometry: every three vertices form a triangle.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            indices: None,
        }
    }

    /// Indexed geometry: every three indices form a triangle.
    pub fn indexed(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices: Some(indices),
        }
    }

    /// The upward-pointing triangle drawn four times per grid cell.
    pub fn triangle() -> Self {
        Self::new(vec![
            Vertex::new(0.0, 0.25, 0.0),
            Vertex::new(-0.25, -0.25, 0.0),
            Vertex::new(0.25, -0.25, 0.0),
        ])
    }

    /// Unit square centered at the origin.
    ///
    /// The vertices are in triangle-strip order; the indices spell out the two
    /// triangles that strip would produce.
    pub fn square() -> Self {
        Self::indexed(
            vec![
                Vertex::new(-0.5, 0.5, 0.0),
                Vertex::new(-0.5, -0.5, 0.0),
                Vertex::new(0.5, 0.5, 0.0),
                Vertex::new(0.5, -0.5, 0.0),
            ],
            vec![0, 1, 2, 2, 1, 3],
        )
    }

    /// Number of elements a draw call consumes: indices when indexed, vertices otherwise.
    pub fn element_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertices.len(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.element_count() / 3
    }

    /// Checks that the geometry describes whole triangles over existing vertices.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.is_empty() {
            return Err(GeometryError::Empty);
        }

        let count = self.element_count();
        if count % 3 != 0 {
            return Err(GeometryError::NotTriangles(count));
        }

        if let Some(indices) = &self.indices {
            let vertex_count = self.vertices.len();
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }
}
