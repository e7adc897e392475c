//! CPU-side triangle subdivision for the tessellation view.
//!
//! wgpu exposes no tessellation stages, so the refinement happens once at load time:
//! every level splits each triangle into four through its edge midpoints. The
//! tessellation pipeline then displaces the refined vertices in its vertex stage.

use std::collections::HashMap;

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::ModelVertex;

/// Each level multiplies the triangle count by four.
pub const MAX_TESSELLATION_LEVEL: u32 = 4;

/// Subdivide an indexed triangle list `levels` times.
///
/// Midpoints are shared between the two triangles of an edge so the result stays
/// watertight wherever the input was. Normals, tangents and bitangents of new
/// vertices are renormalised. Trailing indices that do not form a triangle, and
/// triangles referencing missing vertices, are dropped.
pub fn subdivide(vertices: &[ModelVertex], indices: &[u32], levels: u32) -> (Vec<ModelVertex>, Vec<u32>) {
    let levels = levels.min(MAX_TESSELLATION_LEVEL);
    let mut vertices = vertices.to_vec();
    let count = vertices.len() as u32;
    let mut indices: Vec<u32> = indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|i| *i < count))
        .flatten()
        .copied()
        .collect();

    for _ in 0..levels {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut refined = Vec::with_capacity(indices.len() * 4);

        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            let ab = midpoint(&mut vertices, &mut midpoints, a, b);
            let bc = midpoint(&mut vertices, &mut midpoints, b, c);
            let ca = midpoint(&mut vertices, &mut midpoints, c, a);
            // Keep the winding of the parent triangle
            refined.extend_from_slice(&[a, ab, ca]);
            refined.extend_from_slice(&[ab, b, bc]);
            refined.extend_from_slice(&[ca, bc, c]);
            refined.extend_from_slice(&[ab, bc, ca]);
        }
        indices = refined;
    }

    (vertices, indices)
}

fn midpoint(
    vertices: &mut Vec<ModelVertex>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(idx) = cache.get(&key) {
        return *idx;
    }
    let v = lerp_vertex(&vertices[a as usize], &vertices[b as usize]);
    let idx = vertices.len() as u32;
    vertices.push(v);
    cache.insert(key, idx);
    idx
}

fn lerp_vertex(a: &ModelVertex, b: &ModelVertex) -> ModelVertex {
    let half3 = |x: [f32; 3], y: [f32; 3]| [(x[0] + y[0]) * 0.5, (x[1] + y[1]) * 0.5, (x[2] + y[2]) * 0.5];
    ModelVertex {
        position: half3(a.position, b.position),
        tex_coords: [
            (a.tex_coords[0] + b.tex_coords[0]) * 0.5,
            (a.tex_coords[1] + b.tex_coords[1]) * 0.5,
        ],
        normal: normalized_or_zero(half3(a.normal, b.normal)),
        tangent: normalized_or_zero(half3(a.tangent, b.tangent)),
        bitangent: normalized_or_zero(half3(a.bitangent, b.bitangent)),
    }
}

fn normalized_or_zero(v: [f32; 3]) -> [f32; 3] {
    let v = Vector3::from(v);
    if v.magnitude2() > f32::EPSILON {
        v.normalize().into()
    } else {
        [0.0; 3]
    }
}
