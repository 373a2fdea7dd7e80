//! PLY (Stanford polygon) export.
//!
//! Writes the ASCII variant with positions, normals and texture coordinates
//! (`s`, `t`) per vertex.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ExportMesh;
use crate::error::Result;

/// Write `mesh` as ASCII PLY.
pub fn write<W: Write>(mesh: &ExportMesh<'_>, writer: &mut W) -> Result<()> {
    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by medusa")?;
    writeln!(writer, "element vertex {}", mesh.positions.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property float nx")?;
    writeln!(writer, "property float ny")?;
    writeln!(writer, "property float nz")?;
    writeln!(writer, "property float s")?;
    writeln!(writer, "property float t")?;
    writeln!(writer, "element face {}", mesh.num_triangles())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    // Write vertices
    for ((p, n), uv) in mesh.positions.iter().zip(mesh.normals).zip(mesh.uvs) {
        writeln!(
            writer,
            "{} {} {} {} {} {} {} {}",
            p.x, p.y, p.z, n.x, n.y, n.z, uv.x, uv.y
        )?;
    }

    // Write faces
    for [a, b, c] in mesh.triangles() {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }

    Ok(())
}

/// Save `mesh` to an ASCII PLY file.
pub fn save<P: AsRef<Path>>(mesh: &ExportMesh<'_>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}
