//! Tangent generation and CPU subdivision.

use shaderbox::{
    data_structures::{
        model::ModelVertex,
        tessellation::{MAX_TESSELLATION_LEVEL, subdivide},
    },
    resources::mesh::{compute_tangents, vertices_from_obj},
};

fn vertex(position: [f32; 3], tex_coords: [f32; 2]) -> ModelVertex {
    ModelVertex {
        position,
        tex_coords,
        normal: [0.0, 0.0, 1.0],
        tangent: [0.0; 3],
        bitangent: [0.0; 3],
    }
}

fn quad() -> (Vec<ModelVertex>, Vec<u32>) {
    let vertices = vec![
        vertex([0.0, 0.0, 0.0], [0.0, 0.0]),
        vertex([1.0, 0.0, 0.0], [1.0, 0.0]),
        vertex([1.0, 1.0, 0.0], [1.0, 1.0]),
        vertex([0.0, 1.0, 0.0], [0.0, 1.0]),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

#[test]
fn should_align_tangents_with_texture_axes() {
    let (mut vertices, indices) = quad();
    compute_tangents(&mut vertices, &indices);
    for v in &vertices {
        assert_eq!(v.tangent, [1.0, 0.0, 0.0]);
        assert_eq!(v.bitangent, [0.0, -1.0, 0.0]);
    }
}

#[test]
fn should_leave_unreferenced_vertices_without_tangents() {
    let (mut vertices, indices) = quad();
    vertices.push(vertex([5.0, 5.0, 5.0], [0.5, 0.5]));
    compute_tangents(&mut vertices, &indices);
    assert_eq!(vertices[4].tangent, [0.0; 3]);
    assert_eq!(vertices[4].bitangent, [0.0; 3]);
}

#[test]
fn should_skip_degenerate_texture_coordinates() {
    let mut vertices = vec![
        vertex([0.0, 0.0, 0.0], [0.5, 0.5]),
        vertex([1.0, 0.0, 0.0], [0.5, 0.5]),
        vertex([0.0, 1.0, 0.0], [0.5, 0.5]),
    ];
    compute_tangents(&mut vertices, &[0, 1, 2]);
    assert!(vertices.iter().all(|v| v.tangent == [0.0; 3]));
}

#[test]
fn should_ignore_out_of_range_indices_for_tangents() {
    let (mut vertices, _) = quad();
    compute_tangents(&mut vertices, &[0, 1, 9, 0, 1, 2]);
    assert_eq!(vertices[3].tangent, [0.0; 3]);
    assert_eq!(vertices[0].tangent, [1.0, 0.0, 0.0]);
}

#[test]
fn should_return_input_at_level_zero() {
    let (vertices, indices) = quad();
    let (out_vertices, out_indices) = subdivide(&vertices, &indices, 0);
    assert_eq!(out_vertices, vertices);
    assert_eq!(out_indices, indices);
}

#[test]
fn should_split_each_triangle_into_four() {
    let (vertices, indices) = quad();
    let (out_vertices, out_indices) = subdivide(&vertices, &indices, 1);
    assert_eq!(out_indices.len(), indices.len() * 4);
    // Four corners plus one midpoint per edge, the diagonal is shared
    assert_eq!(out_vertices.len(), 4 + 5);
    assert!(out_indices.iter().all(|i| (*i as usize) < out_vertices.len()));

    let (_, two_levels) = subdivide(&vertices, &indices, 2);
    assert_eq!(two_levels.len(), indices.len() * 16);
}

#[test]
fn should_interpolate_midpoints() {
    let (vertices, _) = quad();
    let (out_vertices, _) = subdivide(&vertices, &[0, 1, 2], 1);
    let ab = out_vertices[3];
    assert_eq!(ab.position, [0.5, 0.0, 0.0]);
    assert_eq!(ab.tex_coords, [0.5, 0.0]);
    assert_eq!(ab.normal, [0.0, 0.0, 1.0]);
}

#[test]
fn should_clamp_subdivision_level() {
    let (vertices, _) = quad();
    let (_, indices) = subdivide(&vertices, &[0, 1, 2], MAX_TESSELLATION_LEVEL + 3);
    assert_eq!(indices.len(), 3 * 4usize.pow(MAX_TESSELLATION_LEVEL));
}

#[test]
fn should_drop_broken_triangles() {
    let (vertices, _) = quad();
    let (_, indices) = subdivide(&vertices, &[0, 1, 2, 0, 2, 7, 3], 0);
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn should_flip_obj_texture_v() {
    let mesh = tobj::Mesh {
        positions: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        texcoords: vec![0.25, 0.75, 1.0, 0.0],
        normals: vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        ..Default::default()
    };
    let vertices = vertices_from_obj(&mesh);
    assert_eq!(vertices.len(), 2);
    assert_eq!(vertices[1].position, [3.0, 4.0, 5.0]);
    assert_eq!(vertices[0].tex_coords, [0.25, 0.25]);
    assert_eq!(vertices[1].tex_coords, [1.0, 1.0]);
    assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
}

#[test]
fn should_zero_missing_obj_attributes() {
    let mesh = tobj::Mesh {
        positions: vec![1.0, 2.0, 3.0],
        ..Default::default()
    };
    let vertices = vertices_from_obj(&mesh);
    assert_eq!(vertices[0].tex_coords, [0.0, 0.0]);
    assert_eq!(vertices[0].normal, [0.0; 3]);
}
