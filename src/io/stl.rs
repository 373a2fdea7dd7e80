//! Binary STL export.
//!
//! STL stores unindexed triangles with one facet normal each, so per-vertex
//! normals and UVs are dropped. Facets with no area get a zero normal.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ExportMesh;
use crate::error::{MedusaError, Result};
use crate::math::NORMAL_EPSILON;

fn to_triangles(mesh: &ExportMesh<'_>) -> Vec<stl_io::Triangle> {
    mesh.triangles()
        .map(|[a, b, c]| {
            let p0 = &mesh.positions[a];
            let p1 = &mesh.positions[b];
            let p2 = &mesh.positions[c];

            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(NORMAL_EPSILON)
                .unwrap_or_else(nalgebra::Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect()
}

/// Write `mesh` as binary STL.
pub fn write<W: Write>(mesh: &ExportMesh<'_>, writer: &mut W) -> Result<()> {
    let triangles = to_triangles(mesh);
    stl_io::write_stl(writer, triangles.iter())?;
    Ok(())
}

/// Save `mesh` to a binary STL file.
pub fn save<P: AsRef<Path>>(mesh: &ExportMesh<'_>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles = to_triangles(mesh);
    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MedusaError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MedusaConfig;
    use crate::generate::build;

    #[test]
    fn test_binary_stl_layout() {
        let buffers = build(&MedusaConfig::default()).unwrap();
        let mut out = Vec::new();
        write(&ExportMesh::rest(&buffers), &mut out).unwrap();

        // 80-byte header, u32 count, 50 bytes per facet
        let n = buffers.num_triangles();
        assert_eq!(out.len(), 84 + 50 * n);
        let count = u32::from_le_bytes([out[80], out[81], out[82], out[83]]);
        assert_eq!(count as usize, n);
    }

    #[test]
    fn test_stl_reads_back() {
        let buffers = build(&MedusaConfig::default()).unwrap();
        let mut out = Vec::new();
        write(&ExportMesh::rest(&buffers), &mut out).unwrap();

        let mut reader = std::io::Cursor::new(out);
        let stl = stl_io::read_stl(&mut reader).unwrap();
        assert_eq!(stl.faces.len(), buffers.num_triangles());
    }
}
