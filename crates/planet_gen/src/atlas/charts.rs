//! Chart decomposition.
//!
//! Triangles are grouped into near-planar islands by region growing over
//! edge adjacency: a chart absorbs a neighboring triangle while that
//! triangle's face normal stays inside the chart's normal cone. Every
//! triangle ends up in exactly one chart.

use std::collections::HashMap;
use std::collections::VecDeque;

use glam::Vec3;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Cosine of the widest angle a chart normal cone may open to.
const NORMAL_CONE_LIMIT: f32 = 0.6;

/// One near-planar island of triangles.
pub struct Chart {
  /// Triangle ids into the source mesh.
  pub triangles: Vec<u32>,
  /// Area-weighted average face normal, unit length.
  pub normal: Vec3,
}

/// Per-triangle edge neighbors. Boundary edges have no partner, non-manifold
/// edges contribute every partner.
fn triangle_adjacency(mesh: &Mesh) -> Vec<SmallVec<[u32; 3]>> {
  let tc = mesh.triangle_count();
  let mut edge_faces: HashMap<(u32, u32), SmallVec<[u32; 2]>> = HashMap::new();
  for t in 0..tc {
    for e in 0..3 {
      let a = mesh.indices[t * 3 + e];
      let b = mesh.indices[t * 3 + (e + 1) % 3];
      let key = (a.min(b), a.max(b));
      edge_faces.entry(key).or_default().push(t as u32);
    }
  }

  let mut adjacency = vec![SmallVec::new(); tc];
  for faces in edge_faces.values() {
    for &a in faces.iter() {
      for &b in faces.iter() {
        if a != b {
          adjacency[a as usize].push(b);
        }
      }
    }
  }
  adjacency
}

fn face_normal(mesh: &Mesh, t: usize) -> Vec3 {
  let p = mesh.triangle(t);
  (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero()
}

/// Decompose the mesh into charts.
pub fn compute_charts(mesh: &Mesh) -> Result<Vec<Chart>> {
  let tc = mesh.triangle_count();
  if tc == 0 {
    return Err(Error::EmptyMesh);
  }

  let adjacency = triangle_adjacency(mesh);
  let normals: Vec<Vec3> = (0..tc).map(|t| face_normal(mesh, t)).collect();

  let mut chart_of = vec![u32::MAX; tc];
  let mut charts = Vec::new();
  for seed in 0..tc {
    if chart_of[seed] != u32::MAX {
      continue;
    }
    let chart_id = charts.len() as u32;
    let mut triangles = vec![seed as u32];
    let mut cone = normals[seed];
    chart_of[seed] = chart_id;

    let mut frontier = VecDeque::from([seed as u32]);
    while let Some(t) = frontier.pop_front() {
      for &next in &adjacency[t as usize] {
        if chart_of[next as usize] != u32::MAX {
          continue;
        }
        let n = normals[next as usize];
        if n.dot(cone) < NORMAL_CONE_LIMIT {
          continue;
        }
        chart_of[next as usize] = chart_id;
        triangles.push(next);
        // Running mean keeps the cone centered on the chart so growth
        // stops once it curves too far from where it started.
        cone = (cone * triangles.len() as f32 + n).normalize_or_zero();
        frontier.push_back(next);
      }
    }

    charts.push(Chart {
      triangles,
      normal: cone,
    });
  }

  let assigned: usize = charts.iter().map(|c| c.triangles.len()).sum();
  if assigned != tc {
    return Err(Error::AtlasTopology(format!(
      "chart decomposition covered {assigned} of {tc} triangles"
    )));
  }
  Ok(charts)
}
