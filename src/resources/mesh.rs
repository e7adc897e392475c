use cgmath::{Vector2, Vector3};

use crate::data_structures::{
    model::{self, GeometryBuffers, ModelVertex},
    tessellation,
};

/// Vertices of an `.obj` mesh loaded with `single_index`.
///
/// Missing texture coordinates and normals are zero. V is flipped because wgpu's
/// texture origin is the top left corner.
pub fn vertices_from_obj(mesh: &tobj::Mesh) -> Vec<ModelVertex> {
    (0..mesh.positions.len() / 3)
        .map(|i| ModelVertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| 1.0 - *f),
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
        })
        .collect()
}

/// Fill in per-vertex tangents and bitangents from the triangle list.
///
/// Each triangle contributes one tangent frame to its three vertices and the
/// contributions are averaged. Triangles with degenerate texture coordinates or out of
/// range indices contribute nothing; vertices without a contribution keep zero vectors.
pub fn compute_tangents(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut triangles_included = vec![0u32; vertices.len()];
    let mut tangents = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    let mut bitangents = tangents.clone();

    for c in indices.chunks_exact(3) {
        let [i0, i1, i2] = [c[0] as usize, c[1] as usize, c[2] as usize];
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let pos0: Vector3<f32> = v0.position.into();
        let pos1: Vector3<f32> = v1.position.into();
        let pos2: Vector3<f32> = v2.position.into();

        let uv0: Vector2<f32> = v0.tex_coords.into();
        let uv1: Vector2<f32> = v1.tex_coords.into();
        let uv2: Vector2<f32> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // Flipped for right-handed normal maps in wgpu's texture coordinate system
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for i in [i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
            triangles_included[i] += 1;
        }
    }

    for (i, n) in triangles_included.into_iter().enumerate() {
        if n == 0 {
            continue;
        }
        let denom = 1.0 / n as f32;
        vertices[i].tangent = (tangents[i] * denom).into();
        vertices[i].bitangent = (bitangents[i] * denom).into();
    }
}

/// Upload a mesh and its subdivided version for the tessellation view.
pub fn build_mesh(
    device: &wgpu::Device,
    name: &str,
    vertices: &[ModelVertex],
    indices: &[u32],
    material: usize,
    tessellation_level: u32,
) -> model::Mesh {
    let (tess_vertices, tess_indices) = tessellation::subdivide(vertices, indices, tessellation_level);
    model::Mesh {
        name: name.to_string(),
        geometry: GeometryBuffers::new(device, name, vertices, indices),
        tessellated: GeometryBuffers::new(device, &format!("{name} tessellated"), &tess_vertices, &tess_indices),
        material,
    }
}
