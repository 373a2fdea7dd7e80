//! Mesh file export.
//!
//! This module writes generated creatures to common interchange formats so
//! they can be inspected in any 3D tool.
//!
//! # Supported Formats
//!
//! | Format | Extension | Normals | UVs | Notes |
//! |--------|-----------|---------|-----|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | ASCII |
//! | STL | `.stl` | face | ✗ | Binary |
//! | PLY | `.ply` | ✓ | ✓ | ASCII |
//!
//! # Usage
//!
//! ```no_run
//! use medusa::config::MedusaConfig;
//! use medusa::generate::build;
//! use medusa::animate::animate;
//! use medusa::io::{save, save_frame};
//!
//! let config = MedusaConfig::default();
//! let buffers = build(&config).unwrap();
//!
//! // Rest pose with automatic format detection
//! save(&buffers, "medusa.obj").unwrap();
//!
//! // One animation frame
//! let frame = animate(&buffers, 0.5, &config);
//! save_frame(&buffers, &frame, "medusa_0.5.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{MedusaError, Result};
use crate::generate::MeshBuffers;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Obj => "obj",
            Format::Stl => "stl",
            Format::Ply => "ply",
        }
    }
}

/// Borrowed view of the data an exporter writes.
#[derive(Debug, Clone, Copy)]
pub struct ExportMesh<'a> {
    /// Vertex positions.
    pub positions: &'a [Point3<f64>],
    /// Vertex normals.
    pub normals: &'a [Vector3<f64>],
    /// Texture coordinates.
    pub uvs: &'a [Point2<f64>],
    /// Flat triangle index list.
    pub indices: &'a [u32],
}

impl<'a> ExportMesh<'a> {
    /// View of the rest pose.
    pub fn rest(buffers: &'a MeshBuffers) -> Self {
        Self {
            positions: &buffers.vertices,
            normals: &buffers.normals,
            uvs: &buffers.uvs,
            indices: &buffers.indices,
        }
    }

    /// View of `buffers` with its positions replaced by an animation frame.
    pub fn posed(buffers: &'a MeshBuffers, positions: &'a [Point3<f64>]) -> Result<Self> {
        if positions.len() != buffers.num_vertices() {
            return Err(MedusaError::AttributeMismatch {
                attribute: "position",
                expected: buffers.num_vertices(),
                found: positions.len(),
            });
        }
        Ok(Self {
            positions,
            ..Self::rest(buffers)
        })
    }

    /// Iterate over triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + 'a {
        let indices: &'a [u32] = self.indices;
        indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Save the rest pose of `buffers`, detecting the format from the extension.
pub fn save<P: AsRef<Path>>(buffers: &MeshBuffers, path: P) -> Result<()> {
    save_mesh(&ExportMesh::rest(buffers), path)
}

/// Save `buffers` posed at `positions`, detecting the format from the extension.
pub fn save_frame<P: AsRef<Path>>(
    buffers: &MeshBuffers,
    positions: &[Point3<f64>],
    path: P,
) -> Result<()> {
    save_mesh(&ExportMesh::posed(buffers, positions)?, path)
}

/// Save a mesh view, detecting the format from the extension.
pub fn save_mesh<P: AsRef<Path>>(mesh: &ExportMesh<'_>, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MedusaError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    log::debug!("Saving {} triangles to {}", mesh.num_triangles(), path.display());

    match format {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}
