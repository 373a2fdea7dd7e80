//! Core mesh data structures.
//!
//! The generators produce [`TriMesh`] values (positions, UVs and a flat
//! triangle index list). The assembler combines them and derives the
//! per-vertex attributes in [`attributes`] to produce the final
//! [`MeshBuffers`](crate::generate::MeshBuffers).
//!
//! # Construction
//!
//! ```
//! use medusa::mesh::TriMesh;
//! use nalgebra::{Point2, Point3};
//!
//! let mut mesh = TriMesh::new();
//! mesh.push_vertex(Point3::new(0.0, 0.0, 0.0), Point2::new(0.0, 0.0));
//! mesh.push_vertex(Point3::new(1.0, 0.0, 0.0), Point2::new(1.0, 0.0));
//! mesh.push_vertex(Point3::new(0.5, 1.0, 0.0), Point2::new(0.5, 1.0));
//! mesh.push_triangle(0, 1, 2);
//!
//! assert!(mesh.validate().is_ok());
//! ```

pub mod attributes;
mod trimesh;

pub(crate) use attributes::lattice_uv;
pub use attributes::{vertex_normals, vertex_tangents, Aabb};
pub use trimesh::TriMesh;
