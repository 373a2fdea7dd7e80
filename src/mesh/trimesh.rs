//! Indexed triangle mesh used for the head, the tentacles and the combined creature.

use nalgebra::{Isometry3, Point2, Point3};

use crate::error::{MedusaError, Result};

/// An indexed triangle mesh with per-vertex UVs.
///
/// Triangles are stored as a flat index list; each consecutive triple is one
/// triangle. Use [`TriMesh::validate`] to check the buffer invariants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Texture coordinates, one per vertex.
    pub uvs: Vec<Point2<f64>>,
    /// Flat triangle index list.
    pub indices: Vec<u32>,
}

impl TriMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for the given number of vertices and triangles.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(num_vertices),
            uvs: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_triangles * 3),
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of complete triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index.
    #[inline]
    pub fn push_vertex(&mut self, position: Point3<f64>, uv: Point2<f64>) -> usize {
        self.positions.push(position);
        self.uvs.push(uv);
        self.positions.len() - 1
    }

    /// Append a triangle.
    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Iterate over triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Check the buffer invariants: whole triangles, in-range indices and
    /// one UV per vertex.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(MedusaError::IncompleteTriangle {
                len: self.indices.len(),
            });
        }
        if self.uvs.len() != self.positions.len() {
            return Err(MedusaError::AttributeMismatch {
                attribute: "uv",
                expected: self.positions.len(),
                found: self.uvs.len(),
            });
        }
        let n = self.num_vertices();
        for (ti, tri) in self.triangles().enumerate() {
            for vi in tri {
                if vi >= n {
                    return Err(MedusaError::InvalidVertexIndex {
                        triangle: ti,
                        vertex: vi,
                    });
                }
            }
        }
        Ok(())
    }

    /// Append `other` after transforming its positions by `transform`.
    ///
    /// Indices of `other` are shifted past the existing vertices. Returns the
    /// index of the first appended vertex.
    pub fn append_transformed(&mut self, other: &TriMesh, transform: &Isometry3<f64>) -> Result<usize> {
        let offset = self.num_vertices();
        let total = offset + other.num_vertices();
        if total > u32::MAX as usize {
            return Err(MedusaError::invalid_param(
                "vertex count",
                total,
                "exceeds the 32-bit index range",
            ));
        }
        let base = offset as u32;

        self.positions
            .extend(other.positions.iter().map(|p| transform * p));
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|&i| i + base));

        Ok(offset)
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let e1 = self.positions[b] - self.positions[a];
                let e2 = self.positions[c] - self.positions[a];
                0.5 * e1.cross(&e2).norm()
            })
            .sum()
    }
}
