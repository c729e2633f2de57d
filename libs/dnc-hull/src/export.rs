//! # OBJ Export
//!
//! Writes a hull as Wavefront OBJ text: a comment header, one `v x y z`
//! line per vertex and one `f i j k` line per face. OBJ indices are
//! 1-based; faces are wound counter-clockwise seen from outside.

use std::borrow::Cow;
use std::io::Write;

use crate::error::HullResult;
use crate::mesh::Mesh;

/// Writes `mesh` as OBJ text to `writer`.
///
/// A mesh with tombstoned slots is compacted on a copy first, so the
/// written indices are always dense.
///
/// # Example
///
/// ```rust
/// use dnc_hull::{convex_hull, export::write_obj};
/// use glam::DVec3;
///
/// let hull = convex_hull(&[DVec3::ZERO, DVec3::X, DVec3::Y])?;
/// let mut out = Vec::new();
/// write_obj(&hull, &mut out)?;
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.contains("f 1 2 3") || text.contains("f 1 3 2"));
/// # Ok::<(), dnc_hull::HullError>(())
/// ```
pub fn write_obj<W: Write>(mesh: &Mesh, mut writer: W) -> HullResult<()> {
    let mesh = if mesh.live_count() == mesh.slot_count() {
        Cow::Borrowed(mesh)
    } else {
        let mut compacted = mesh.clone();
        compacted.compact();
        Cow::Owned(compacted)
    };
    let faces = mesh.oriented_faces();

    writeln!(
        writer,
        "# convex hull: {} vertices, {} faces",
        mesh.slot_count(),
        faces.len()
    )?;
    for p in mesh.positions() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for [i, j, k] in faces {
        writeln!(writer, "f {} {} {}", i + 1, j + 1, k + 1)?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders `mesh` as an OBJ string.
pub fn to_obj_string(mesh: &Mesh) -> HullResult<String> {
    let mut out = Vec::new();
    write_obj(mesh, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
