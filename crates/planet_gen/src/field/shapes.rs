//! Base shape SDF registry.
//!
//! Every shape is a pure signed-distance (or distance-bound) function in
//! metric coordinates, negative inside the body. Sizes are tuned so each
//! surface fits comfortably inside the sampled ±1000 domain and stays
//! resolvable at the fixed grid resolution.

use glam::{Vec2, Vec3, Vec3Swizzles};
use std::f32::consts::{PI, TAU};

use super::util::smooth_min;
use crate::error::{Error, Result};

/// Closed registry of base shapes, dispatched by name at configuration
/// time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeMode {
  Hexagon,
  Square,
  Sphere,
  Torus,
  Tube,
  Disk,
  Capsule,
  Box,
  Cube,
  Tetrahedron,
  Octahedron,
  Knot,
  MobiusStrip,
  Fibers,
  H2O,
  H3O,
  H4O,
  TriangularPrism,
  HexagonalPrism,
}

impl ShapeMode {
  pub const ALL: &'static [ShapeMode] = &[
    ShapeMode::Hexagon,
    ShapeMode::Square,
    ShapeMode::Sphere,
    ShapeMode::Torus,
    ShapeMode::Tube,
    ShapeMode::Disk,
    ShapeMode::Capsule,
    ShapeMode::Box,
    ShapeMode::Cube,
    ShapeMode::Tetrahedron,
    ShapeMode::Octahedron,
    ShapeMode::Knot,
    ShapeMode::MobiusStrip,
    ShapeMode::Fibers,
    ShapeMode::H2O,
    ShapeMode::H3O,
    ShapeMode::H4O,
    ShapeMode::TriangularPrism,
    ShapeMode::HexagonalPrism,
  ];

  pub fn name(self) -> &'static str {
    match self {
      ShapeMode::Hexagon => "hexagon",
      ShapeMode::Square => "square",
      ShapeMode::Sphere => "sphere",
      ShapeMode::Torus => "torus",
      ShapeMode::Tube => "tube",
      ShapeMode::Disk => "disk",
      ShapeMode::Capsule => "capsule",
      ShapeMode::Box => "box",
      ShapeMode::Cube => "cube",
      ShapeMode::Tetrahedron => "tetrahedron",
      ShapeMode::Octahedron => "octahedron",
      ShapeMode::Knot => "knot",
      ShapeMode::MobiusStrip => "mobiusstrip",
      ShapeMode::Fibers => "fibers",
      ShapeMode::H2O => "h2o",
      ShapeMode::H3O => "h3o",
      ShapeMode::H4O => "h4o",
      ShapeMode::TriangularPrism => "triangularprism",
      ShapeMode::HexagonalPrism => "hexagonalprism",
    }
  }

  pub fn from_name(name: &str) -> Result<ShapeMode> {
    Self::ALL
      .iter()
      .copied()
      .find(|m| m.name() == name)
      .ok_or_else(|| Error::UnknownShapeMode(name.to_owned()))
  }

  /// Evaluate the SDF at a metric-space point.
  pub fn evaluate(self, p: Vec3) -> f32 {
    match self {
      ShapeMode::Hexagon => sd_hex_prism(p.xzy(), Vec2::new(800.0, 160.0)),
      ShapeMode::Square => sd_box(p, Vec3::new(800.0, 150.0, 800.0)) - 50.0,
      ShapeMode::Sphere => sd_sphere(p, 800.0),
      ShapeMode::Torus => sd_torus(p, 650.0, 250.0),
      ShapeMode::Tube => sd_tube(p),
      ShapeMode::Disk => sd_capped_cylinder(p, 800.0, 180.0) - 40.0,
      ShapeMode::Capsule => sd_capsule(p, 480.0, 380.0),
      ShapeMode::Box => sd_box(p, Vec3::new(750.0, 450.0, 550.0)) - 60.0,
      ShapeMode::Cube => sd_box(p, Vec3::splat(600.0)) - 60.0,
      ShapeMode::Tetrahedron => sd_tetrahedron(p, 650.0),
      ShapeMode::Octahedron => sd_octahedron(p, 850.0),
      ShapeMode::Knot => sd_knot(p),
      ShapeMode::MobiusStrip => sd_mobius_strip(p),
      ShapeMode::Fibers => sd_fibers(p),
      ShapeMode::H2O => sd_molecule(p, 2),
      ShapeMode::H3O => sd_molecule(p, 3),
      ShapeMode::H4O => sd_molecule(p, 4),
      ShapeMode::TriangularPrism => sd_tri_prism(p.xzy(), Vec2::new(750.0, 450.0)),
      ShapeMode::HexagonalPrism => sd_hex_prism(p.xzy(), Vec2::new(650.0, 450.0)),
    }
  }
}

fn sd_sphere(p: Vec3, r: f32) -> f32 {
  p.length() - r
}

fn sd_box(p: Vec3, half: Vec3) -> f32 {
  let q = p.abs() - half;
  q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

fn sd_torus(p: Vec3, major: f32, minor: f32) -> f32 {
  let q = Vec2::new(p.xz().length() - major, p.y);
  q.length() - minor
}

/// Open cylindrical shell with capped ends.
fn sd_tube(p: Vec3) -> f32 {
  let shell = (p.xz().length() - 550.0).abs() - 200.0;
  let cap = p.y.abs() - 700.0;
  let d = Vec2::new(shell, cap);
  d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

fn sd_capped_cylinder(p: Vec3, r: f32, half_h: f32) -> f32 {
  let d = Vec2::new(p.xz().length() - r, p.y.abs() - half_h);
  d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Vertical line-segment capsule.
fn sd_capsule(p: Vec3, half: f32, r: f32) -> f32 {
  let y = p.y.clamp(-half, half);
  (p - Vec3::new(0.0, y, 0.0)).length() - r
}

/// Regular tetrahedron (distance bound): max of four plane distances.
fn sd_tetrahedron(p: Vec3, s: f32) -> f32 {
  let a = (p.x + p.y).abs() + p.z;
  let b = (p.x - p.y).abs() - p.z;
  (a.max(b) - s) / 3.0_f32.sqrt()
}

fn sd_octahedron(p: Vec3, s: f32) -> f32 {
  let q = p.abs();
  (q.x + q.y + q.z - s) * 0.577_350_26
}

/// Prism along z; callers swizzle to choose the extrusion axis.
fn sd_tri_prism(p: Vec3, h: Vec2) -> f32 {
  let q = p.abs();
  (q.z - h.y).max((q.x * 0.866_025 + p.y * 0.5).max(-p.y) - h.x * 0.5)
}

/// Prism along z; callers swizzle to choose the extrusion axis.
fn sd_hex_prism(p: Vec3, h: Vec2) -> f32 {
  const K: Vec3 = Vec3::new(-0.866_025_4, 0.5, 0.577_35);
  let mut q = p.abs();
  let refl = 2.0 * K.xy().dot(q.xy()).min(0.0);
  q.x -= refl * K.x;
  q.y -= refl * K.y;
  let clamped = Vec2::new(q.x.clamp(-K.z * h.x, K.z * h.x), h.x);
  let d = Vec2::new(
    (q.xy() - clamped).length() * (q.y - h.x).signum(),
    q.z - h.y,
  );
  d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
}

/// Two strands twisting around a ring: a (2,3) torus-knot approximation.
fn sd_knot(p: Vec3) -> f32 {
  let theta = p.z.atan2(p.x);
  let q = Vec2::new(p.xz().length() - 600.0, p.y);
  let mut d = f32::INFINITY;
  for i in 0..2 {
    let a = 1.5 * theta + PI * i as f32;
    let c = Vec2::new(a.cos(), a.sin()) * 260.0;
    d = d.min((q - c).length() - 170.0);
  }
  d
}

/// Flat ribbon with a half-twist around the ring.
fn sd_mobius_strip(p: Vec3) -> f32 {
  let theta = p.z.atan2(p.x);
  let q = Vec2::new(p.xz().length() - 650.0, p.y);
  let (s, c) = (-0.5 * theta).sin_cos();
  let r = Vec2::new(q.x * c - q.y * s, q.x * s + q.y * c);
  let d = r.abs() - Vec2::new(260.0, 100.0);
  d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0) - 40.0
}

/// Bundle of twisted strands along the x axis.
fn sd_fibers(p: Vec3) -> f32 {
  let twist = p.x * 0.002;
  let (s, c) = twist.sin_cos();
  let yz = Vec2::new(p.y * c - p.z * s, p.y * s + p.z * c);

  // Six strands on a ring around the axis.
  let angle = yz.y.atan2(yz.x);
  let sector = TAU / 6.0;
  let snapped = (angle / sector).round() * sector;
  let center = Vec2::new(snapped.cos(), snapped.sin()) * 380.0;
  let radial = (yz - center).length() - 180.0;

  let cap = p.x.abs() - 800.0;
  let d = Vec2::new(radial, cap);
  d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Central sphere with `n` satellites smoothly blended on.
fn sd_molecule(p: Vec3, n: u32) -> f32 {
  let mut d = sd_sphere(p, 430.0);
  for i in 0..n {
    let a = TAU * i as f32 / n as f32;
    let tilt = if i % 2 == 0 { 0.35 } else { -0.35 };
    let c = Vec3::new(a.cos(), tilt, a.sin()).normalize() * 640.0;
    d = smooth_min(d, sd_sphere(p - c, 300.0), 120.0);
  }
  d
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_name_round_trips() {
    for &mode in ShapeMode::ALL {
      assert_eq!(ShapeMode::from_name(mode.name()).unwrap(), mode);
    }
  }

  #[test]
  fn unknown_name_rejected() {
    assert!(ShapeMode::from_name("blob").is_err());
  }

  #[test]
  fn registry_has_nineteen_entries() {
    assert_eq!(ShapeMode::ALL.len(), 19);
  }

  #[test]
  fn every_shape_crosses_zero_in_domain() {
    // Scan a coarse lattice over the metric domain; each shape must have
    // both solid and empty samples or extraction would be vacuous.
    for &mode in ShapeMode::ALL {
      let mut neg = false;
      let mut pos = false;
      let n = 24;
      for x in 0..n {
        for y in 0..n {
          for z in 0..n {
            let p = (Vec3::new(x as f32, y as f32, z as f32) * 2.0 / n as f32
              - Vec3::ONE)
              * 1000.0;
            let d = mode.evaluate(p);
            assert!(d.is_finite(), "{} produced non-finite sdf", mode.name());
            neg |= d < 0.0;
            pos |= d > 0.0;
          }
        }
      }
      assert!(neg && pos, "{} never crosses zero", mode.name());
    }
  }

  #[test]
  fn sphere_distance_is_exact() {
    let d = ShapeMode::Sphere.evaluate(Vec3::new(1000.0, 0.0, 0.0));
    assert!((d - 200.0).abs() < 1e-3);
  }
}
