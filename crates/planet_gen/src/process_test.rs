use glam::Vec3;

use super::*;
use crate::config::GenConfig;
use crate::extract;
use crate::field::TerrainField;
use crate::grid::DensityGrid;

fn sphere_mesh(n: usize) -> Mesh {
  let cfg = GenConfig {
    shape_mode: "sphere".into(),
    elevation_mode: "none".into(),
    resolution: n,
    ..GenConfig::default()
  };
  let resolved = cfg.resolve().unwrap();
  let field = TerrainField::new(&resolved);
  let grid = DensityGrid::sample(n, |p| field.sdf_land(p)).unwrap();
  let quads = extract::extract(&grid, 0.0);
  extract::triangulate(&quads, n).unwrap()
}

#[test]
fn normalize_scale_yields_unit_mean_edge() {
  let mut mesh = sphere_mesh(24);
  let scale = normalize_scale(&mut mesh);
  assert!(scale > 0.0);

  let tc = mesh.triangle_count();
  let mut sum = 0.0f64;
  for t in 0..tc {
    let p = mesh.triangle(t);
    for e in 0..3 {
      sum += p[e].distance(p[(e + 1) % 3]) as f64;
    }
  }
  let mean = sum / (tc as f64 * 3.0);
  assert!((mean - 1.0).abs() < 1e-3, "mean edge {mean}");
}

#[test]
fn cluster_decimator_reduces_below_budget_mesh_untouched() {
  let mesh = sphere_mesh(24);
  let budget = mesh.triangle_count() + 10;
  let out = ClusterDecimator
    .simplify(&mesh, SimplifyProfile::Render, budget)
    .unwrap();
  assert_eq!(out.triangle_count(), mesh.triangle_count());
}

#[test]
fn cluster_decimator_never_increases_triangles() {
  let mesh = sphere_mesh(32);
  for &budget in &[50usize, 200, 1000] {
    let out = ClusterDecimator
      .simplify(&mesh, SimplifyProfile::Collider, budget)
      .unwrap();
    assert!(
      out.triangle_count() <= mesh.triangle_count(),
      "budget {budget}: {} > {}",
      out.triangle_count(),
      mesh.triangle_count()
    );
    assert!(out.indices_valid());
  }
}

#[test]
fn cluster_decimator_coarse_output_shrinks() {
  let mesh = sphere_mesh(32);
  let out = ClusterDecimator
    .simplify(&mesh, SimplifyProfile::Navigation, 100)
    .unwrap();
  assert!(out.triangle_count() < mesh.triangle_count() / 2);
  assert!(!out.is_empty());
}

#[test]
fn split_chunks_covers_all_triangles() {
  let mut mesh = sphere_mesh(24);
  normalize_scale(&mut mesh);
  let max = 100;
  let chunks = split_chunks(&mesh, max);
  assert!(chunks.len() > 1);

  let total: usize = chunks.iter().map(|c| c.triangle_count()).sum();
  assert_eq!(total, mesh.triangle_count());
  for chunk in &chunks {
    assert!(chunk.triangle_count() <= max);
    assert!(chunk.indices_valid());
    assert!(!chunk.is_empty());
  }
}

#[test]
fn split_chunks_small_mesh_is_single_chunk() {
  let mesh = sphere_mesh(16);
  let chunks = split_chunks(&mesh, mesh.triangle_count());
  assert_eq!(chunks.len(), 1);
  assert_eq!(chunks[0].triangle_count(), mesh.triangle_count());
}

#[test]
fn split_chunks_are_spatially_local() {
  let mut mesh = sphere_mesh(24);
  normalize_scale(&mut mesh);
  let chunks = split_chunks(&mesh, 100);
  let (min, max) = mesh.bounds();
  let whole = (max - min).length();
  for chunk in &chunks {
    let (cmin, cmax) = chunk.bounds();
    let local = (cmax - cmin).length();
    assert!(local < whole, "chunk bounds should be tighter than the mesh");
  }
}

#[test]
fn submesh_vertices_are_compacted() {
  let mesh = sphere_mesh(16);
  let count = mesh.triangle_count() as u32;
  let mut triangles: Vec<u32> = (0..count / 2).collect();
  let sub = submesh(&mesh, &triangles);
  assert!(sub.vertices.len() <= mesh.vertices.len());
  assert!(sub.indices_valid());
  // Every extracted triangle keeps its geometry.
  triangles.truncate(3);
  for (i, &t) in triangles.iter().enumerate() {
    assert_eq!(sub.triangle(i), mesh.triangle(t as usize));
  }
}

#[test]
fn normalize_scale_is_uniform() {
  let mut mesh = sphere_mesh(16);
  let before = mesh.bounds();
  let scale = normalize_scale(&mut mesh);
  let after = mesh.bounds();
  let expected = (before.1 - before.0) * scale;
  assert!((after.1 - after.0 - expected).length() < 1e-3 * expected.length());
}

#[test]
fn cluster_decimator_empty_result_is_fatal() {
  // A degenerate single-triangle sliver collapses into one cluster.
  let mesh = Mesh {
    vertices: vec![
      crate::mesh::Vertex::at(Vec3::ZERO),
      crate::mesh::Vertex::at(Vec3::splat(1e-8)),
      crate::mesh::Vertex::at(Vec3::splat(2e-8)),
    ],
    indices: vec![0, 1, 2],
  };
  let err = ClusterDecimator.simplify(&mesh, SimplifyProfile::Collider, 0);
  assert!(err.is_err());
}