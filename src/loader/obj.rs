use crate::gfx::geometry::MeshData;

/// Parses Wavefront OBJ text into a single indexed mesh.
///
/// Polygons are fan-triangulated from their first corner and every unique
/// position/texture/normal index triple becomes one output vertex, numbered
/// in order of first use. All objects and groups of the file are merged.
/// Materials are ignored.
///
/// Normals and texture coordinates are left empty if no object has them;
/// objects lacking them in a file where others have them get zeros.
pub fn parse_obj(text: &str) -> Result<MeshData, tobj::LoadError> {
    let mut reader = text.as_bytes();
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )?;

    let with_normals = models.iter().any(|m| !m.mesh.normals.is_empty());
    let with_texcoords = models.iter().any(|m| !m.mesh.texcoords.is_empty());

    let mut data = MeshData::default();
    for model in &models {
        let mesh = &model.mesh;
        let offset = data.vertex_count() as u32;
        let vertex_count = mesh.positions.len() / 3;

        data.positions.extend_from_slice(&mesh.positions);
        data.indices.extend(mesh.indices.iter().map(|index| index + offset));

        if with_normals {
            append_or_zero(&mut data.normals, &mesh.normals, vertex_count * 3, &model.name, "normals");
        }
        if with_texcoords {
            append_or_zero(&mut data.texcoords, &mesh.texcoords, vertex_count * 2, &model.name, "texture coordinates");
        }
    }

    log::debug!(
        "parsed OBJ with {} objects, {} vertices and {} triangles",
        models.len(),
        data.vertex_count(),
        data.triangle_count()
    );
    Ok(data)
}

fn append_or_zero(target: &mut Vec<f32>, source: &[f32], expected: usize, object: &str, what: &str) {
    if source.len() == expected {
        target.extend_from_slice(source);
    } else {
        log::warn!("object '{object}' has no {what}, filling with zeros");
        target.resize(target.len() + expected, 0.0);
    }
}
