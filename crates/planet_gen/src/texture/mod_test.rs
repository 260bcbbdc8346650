use glam::{Vec2, Vec3};

use super::*;
use crate::mesh::Vertex;

/// Constant evaluator so coverage is easy to assert.
struct FlatMaterial;

impl MaterialEval for FlatMaterial {
  fn material(&self, _p: Vec3, _n: Vec3) -> ([f32; 3], [f32; 2]) {
    ([0.5, 0.25, 1.0], [0.8, 0.1])
  }

  fn height(&self, _p: Vec3, _n: Vec3) -> f32 {
    0.75
  }

  fn path_property(&self, _p: Vec3, _n: Vec3) -> (u32, f32) {
    (0, 0.0)
  }
}

/// Evaluator that echoes the interpolated position into the color.
struct PositionEcho;

impl MaterialEval for PositionEcho {
  fn material(&self, p: Vec3, _n: Vec3) -> ([f32; 3], [f32; 2]) {
    (p.to_array(), [0.0, 0.0])
  }

  fn height(&self, p: Vec3, _n: Vec3) -> f32 {
    p.x
  }

  fn path_property(&self, _p: Vec3, _n: Vec3) -> (u32, f32) {
    (0, 0.0)
  }
}

/// Two triangles spanning the full UV square.
fn full_quad() -> Mesh {
  let positions = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
  ];
  let uvs = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.999, 0.0),
    Vec2::new(0.999, 0.999),
    Vec2::new(0.0, 0.999),
  ];
  let vertices = positions
    .iter()
    .zip(&uvs)
    .map(|(&p, &uv)| Vertex {
      position: p,
      normal: Vec3::Z,
      uv,
    })
    .collect();
  Mesh {
    vertices,
    indices: vec![0, 1, 2, 0, 2, 3],
  }
}

#[test]
fn full_quad_leaves_no_holes() {
  let textures = synthesize(&full_quad(), 16, 16, 1, &FlatMaterial).unwrap();
  for y in 0..textures.albedo.height() {
    for x in 0..textures.albedo.width() {
      assert!(
        textures.albedo.get(x, y).iter().any(|&v| v != 0.0),
        "texel ({x},{y}) unset after inpainting"
      );
    }
  }
}

#[test]
fn covered_texels_carry_material_values() {
  let textures = synthesize(&full_quad(), 8, 8, 2, &FlatMaterial).unwrap();
  // The quad center is rasterized directly, never inpainted.
  let (cx, cy) = (textures.albedo.width() / 2, textures.albedo.height() / 2);
  assert_eq!(textures.albedo.get(cx, cy), &[0.5, 0.25, 1.0]);
  assert_eq!(textures.special.get(cx, cy), &[0.8, 0.1]);
  assert_eq!(textures.height.get(cx, cy), &[0.75]);
}

#[test]
fn upscale_multiplies_resolution() {
  let one = synthesize(&full_quad(), 8, 8, 1, &FlatMaterial).unwrap();
  let two = synthesize(&full_quad(), 8, 8, 2, &FlatMaterial).unwrap();
  assert_eq!(one.albedo.width() * 2, two.albedo.width());
  assert_eq!(one.albedo.height() * 2, two.albedo.height());
}

#[test]
fn interpolated_positions_track_uv_location() {
  let textures = synthesize(&full_quad(), 32, 32, 1, &PositionEcho).unwrap();
  let w = textures.albedo.width();
  let h = textures.albedo.height();
  // After the vertical flip, image row 0 is the top of UV space. Sample
  // a point three quarters along x, one quarter up.
  let x = (w as f32 * 0.75) as u32;
  let y_img = (h as f32 * 0.75) as u32;
  let texel = textures.albedo.get(x, y_img);
  assert!((texel[0] - 0.75).abs() < 0.1, "x = {}", texel[0]);
  assert!((texel[1] - 0.25).abs() < 0.1, "y = {}", texel[1]);
}

#[test]
fn collinear_uv_triangles_carry_no_texels() {
  // A sliver whose UVs collapse onto a vertical line: its scanlines
  // cover pixels but its barycentrics are undefined. Synthesis must
  // skip it instead of aborting, and the well-formed triangles still
  // fill the image.
  let mut mesh = full_quad();
  let base = mesh.vertices.len() as u32;
  for &uv in &[
    Vec2::new(0.5, 0.1),
    Vec2::new(0.5, 0.5),
    Vec2::new(0.5, 0.9),
  ] {
    mesh.vertices.push(Vertex {
      position: Vec3::new(uv.x, uv.y, 1.0),
      normal: Vec3::Z,
      uv,
    });
  }
  mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);

  let textures = synthesize(&mesh, 16, 16, 1, &FlatMaterial).unwrap();
  let (cx, cy) = (textures.albedo.width() / 2, textures.albedo.height() / 2);
  assert_eq!(textures.albedo.get(cx, cy), &[0.5, 0.25, 1.0]);
}

#[test]
fn empty_mesh_produces_blank_images() {
  let textures = synthesize(&Mesh::default(), 4, 4, 1, &FlatMaterial).unwrap();
  assert!(textures.albedo.data().iter().all(|&v| v == 0.0));
}
