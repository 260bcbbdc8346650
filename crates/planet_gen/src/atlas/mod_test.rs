use glam::Vec3;

use super::*;
use crate::mesh::Vertex;

fn options() -> PackOptions {
  PackOptions {
    texels_per_unit: 8.0,
    padding: 2,
    bilinear: true,
    block_align: true,
  }
}

/// Axis-aligned unit cube, 12 triangles.
fn cube_mesh() -> Mesh {
  let corners = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
  ];
  let faces: [[u32; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [1, 2, 6, 5],
    [0, 4, 7, 3],
  ];
  let mut vertices: Vec<Vertex> = corners.iter().map(|&p| Vertex::at(p)).collect();
  for v in &mut vertices {
    v.normal = (v.position - Vec3::splat(0.5)).normalize();
  }
  let mut indices = Vec::new();
  for f in faces {
    indices.extend_from_slice(&[f[0], f[1], f[2], f[0], f[2], f[3]]);
  }
  Mesh { vertices, indices }
}

#[test]
fn empty_mesh_is_fatal() {
  let mesh = Mesh::default();
  assert!(build(&mesh, &options()).is_err());
}

#[test]
fn cube_faces_become_separate_charts() {
  // Adjacent cube faces meet at 90 degrees, outside the normal cone, so
  // each face parameterizes on its own.
  let atlas = build(&cube_mesh(), &options()).unwrap();
  assert_eq!(atlas.indices.len(), 36);
  // Each face chart owns private copies of its 4 corners.
  assert_eq!(atlas.vertices.len(), 24);
}

#[test]
fn atlas_uvs_stay_inside_unit_square() {
  let mesh = cube_mesh();
  let atlas = build(&mesh, &options()).unwrap();
  let remapped = atlas.apply(&mesh);
  for v in &remapped.vertices {
    assert!(v.uv.x >= 0.0 && v.uv.x < 1.0, "u = {}", v.uv.x);
    assert!(v.uv.y >= 0.0 && v.uv.y < 1.0, "v = {}", v.uv.y);
  }
}

#[test]
fn apply_preserves_geometry_through_xref() {
  let mesh = cube_mesh();
  let atlas = build(&mesh, &options()).unwrap();
  let remapped = atlas.apply(&mesh);
  assert!(remapped.indices_valid());
  assert_eq!(remapped.triangle_count(), mesh.triangle_count());
  for (v, av) in remapped.vertices.iter().zip(&atlas.vertices) {
    let src = mesh.vertices[av.xref as usize];
    assert_eq!(v.position, src.position);
    assert_eq!(v.normal, src.normal);
  }
}

#[test]
fn charts_do_not_overlap() {
  // Rasterize chart bounding boxes (padding excluded) and check each
  // texel is claimed by at most one chart.
  let mesh = cube_mesh();
  let atlas = build(&mesh, &options()).unwrap();
  let mut owner = vec![u32::MAX; (atlas.width * atlas.height) as usize];
  // Chart vertices come out grouped, 4 per cube face.
  for (chart, group) in atlas.vertices.chunks(4).enumerate() {
    let min_x = group.iter().map(|v| v.uv.x as u32).min().unwrap();
    let max_x = group.iter().map(|v| v.uv.x.ceil() as u32).max().unwrap();
    let min_y = group.iter().map(|v| v.uv.y as u32).min().unwrap();
    let max_y = group.iter().map(|v| v.uv.y.ceil() as u32).max().unwrap();
    for y in min_y..=max_y {
      for x in min_x..=max_x {
        let cell = &mut owner[(y * atlas.width + x) as usize];
        assert!(
          *cell == u32::MAX || *cell == chart as u32,
          "texel ({x},{y}) claimed by charts {cell} and {chart}"
        );
        *cell = chart as u32;
      }
    }
  }
}

#[test]
fn chart_scale_follows_texel_density() {
  let mesh = cube_mesh();
  let coarse = build(
    &mesh,
    &PackOptions {
      texels_per_unit: 4.0,
      ..options()
    },
  )
  .unwrap();
  let fine = build(
    &mesh,
    &PackOptions {
      texels_per_unit: 16.0,
      ..options()
    },
  )
  .unwrap();
  assert!(fine.width * fine.height > coarse.width * coarse.height);
}

#[test]
fn block_alignment_snaps_chart_origins() {
  let atlas = build(&cube_mesh(), &options()).unwrap();
  for group in atlas.vertices.chunks(4) {
    let min_x = group.iter().map(|v| v.uv.x).fold(f32::INFINITY, f32::min);
    let min_y = group.iter().map(|v| v.uv.y).fold(f32::INFINITY, f32::min);
    assert_eq!(min_x % 4.0, 0.0, "chart origin x {min_x} not block aligned");
    assert_eq!(min_y % 4.0, 0.0, "chart origin y {min_y} not block aligned");
  }
}
