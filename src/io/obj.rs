//! Wavefront OBJ export.
//!
//! Writes positions, texture coordinates and normals, with faces referencing
//! all three (`f v/vt/vn ...`). OBJ indices are 1-based.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ExportMesh;
use crate::error::Result;

/// Write `mesh` as OBJ text.
pub fn write<W: Write>(mesh: &ExportMesh<'_>, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by medusa")?;
    writeln!(writer, "o medusa")?;

    for p in mesh.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for uv in mesh.uvs {
        writeln!(writer, "vt {} {}", uv.x, uv.y)?;
    }
    for n in mesh.normals {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }

    Ok(())
}

/// Save `mesh` to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use medusa::config::MedusaConfig;
/// use medusa::generate::build;
/// use medusa::io::{obj, ExportMesh};
///
/// let buffers = build(&MedusaConfig::default()).unwrap();
/// obj::save(&ExportMesh::rest(&buffers), "medusa.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &ExportMesh<'_>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}
