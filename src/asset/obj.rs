use std::path::Path;

use anyhow::Context;

use crate::asset::Mesh;
use crate::renderer::Vertex;

/// Load a Wavefront OBJ file into a single [`Mesh`].
///
/// All objects in the file are merged into one vertex/index stream. Missing
/// attributes fall back to zeroed texture coordinates and +Y normals so a
/// position-only OBJ still renders. Fails on a missing or malformed file;
/// assets are build-time content, so the caller treats this as fatal.
pub fn load_obj(device: &wgpu::Device, path: impl AsRef<Path>) -> anyhow::Result<Mesh> {
    let path = path.as_ref();
    log::info!("Loading OBJ model: {:?}", path);

    let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .with_context(|| format!("failed to load OBJ {:?}", path))?;

    let (vertices, indices) = interleave(&models);
    if vertices.is_empty() {
        anyhow::bail!("OBJ {:?} contains no geometry", path);
    }

    Ok(Mesh::new(device, &vertices, Some(&indices)))
}

/// Flatten tobj's per-object position/uv/normal streams into interleaved
/// vertices and a single index stream.
///
/// OBJ texture coordinates have their origin at the bottom-left; the V axis
/// is flipped here to match the top-left origin the samplers expect.
fn interleave(models: &[tobj::Model]) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let base = vertices.len() as u32;
        let vertex_count = mesh.positions.len() / 3;

        if mesh.texcoords.is_empty() {
            log::warn!(
                "OBJ object {:?} has no texture coordinates; using (0, 0)",
                model.name
            );
        }
        if mesh.normals.is_empty() {
            log::warn!("OBJ object {:?} has no normals; using +Y", model.name);
        }

        for i in 0..vertex_count {
            let position = [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ];
            let uv = if mesh.texcoords.is_empty() {
                [0.0, 0.0]
            } else {
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            };
            let normal = if mesh.normals.is_empty() {
                [0.0, 1.0, 0.0]
            } else {
                [
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                ]
            };
            vertices.push(Vertex {
                position,
                uv,
                normal,
            });
        }

        indices.extend(mesh.indices.iter().map(|&i| base + i));
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    const QUAD_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    fn load_quad() -> Vec<tobj::Model> {
        let mut reader = BufReader::new(Cursor::new(QUAD_OBJ));
        let (models, _) = tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| {
            Ok((Vec::new(), Default::default()))
        })
        .expect("quad OBJ parses");
        models
    }

    #[test]
    fn interleave_builds_one_vertex_per_position() {
        let models = load_quad();
        let (vertices, indices) = interleave(&models);

        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn interleave_flips_the_v_axis() {
        let models = load_quad();
        let (vertices, _) = interleave(&models);

        let bottom_left = vertices
            .iter()
            .find(|v| v.position == [0.0, 0.0, 0.0])
            .expect("bottom-left vertex present");
        // OBJ vt (0, 0) is the bottom-left corner; sampling space puts it at v = 1.
        assert_eq!(bottom_left.uv, [0.0, 1.0]);
    }

    #[test]
    fn interleave_carries_normals_through() {
        let models = load_quad();
        let (vertices, _) = interleave(&models);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
