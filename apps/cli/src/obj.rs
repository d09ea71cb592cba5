// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export of the working mesh.

use slice27_geometry::Mesh;
use std::io::{self, Write};

/// Write `mesh` as OBJ. Sub-meshes become `g` groups.
pub fn write_obj<W: Write>(out: &mut W, mesh: &Mesh) -> io::Result<()> {
    writeln!(out, "# Generated by slice27")?;
    writeln!(
        out,
        "# {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;
    writeln!(out, "o {}", object_name(&mesh.name))?;

    for p in mesh.positions.chunks_exact(3) {
        writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
    }
    for t in mesh.uvs.chunks_exact(2) {
        writeln!(out, "vt {:.6} {:.6}", t[0], t[1])?;
    }
    for n in mesh.normals.chunks_exact(3) {
        writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
    }

    let has_uvs = !mesh.uvs.is_empty();
    let has_normals = !mesh.normals.is_empty();

    if mesh.submeshes.is_empty() {
        write_faces(out, &mesh.indices, has_uvs, has_normals)?;
    } else {
        for i in 0..mesh.submesh_count() {
            writeln!(out, "g submesh_{}", i)?;
            if let Some(indices) = mesh.submesh_indices(i) {
                write_faces(out, indices, has_uvs, has_normals)?;
            }
        }
    }
    Ok(())
}

fn write_faces<W: Write>(
    out: &mut W,
    indices: &[u32],
    has_uvs: bool,
    has_normals: bool,
) -> io::Result<()> {
    for tri in indices.chunks_exact(3) {
        write!(out, "f")?;
        for &index in tri {
            // OBJ indices are 1-based
            let i = index + 1;
            match (has_uvs, has_normals) {
                (true, true) => write!(out, " {i}/{i}/{i}")?,
                (true, false) => write!(out, " {i}/{i}")?,
                (false, true) => write!(out, " {i}//{i}")?,
                (false, false) => write!(out, " {i}")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn object_name(name: &str) -> String {
    if name.is_empty() {
        return "mesh".into();
    }
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
