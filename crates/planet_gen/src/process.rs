//! Mesh processing: scale normalization, simplification profiles and
//! chunk splitting.
//!
//! Simplification is a collaborator seam: the pipeline is generic over
//! [`Decimator`] so a real decimation library can be dropped in. The
//! built-in [`ClusterDecimator`] is a uniform vertex-clustering reducer
//! that honors the trait contract (never increases the triangle count).

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::mesh::{Mesh, Vertex};

/// Normalize the mesh so the mean triangle edge length is ~1.
///
/// Keeps downstream texel densities and simplification thresholds
/// resolution-independent. Returns the applied scale factor.
pub fn normalize_scale(mesh: &mut Mesh) -> f32 {
  let tc = mesh.triangle_count();
  let mut sum = 0.0f64;
  for t in 0..tc {
    let p = mesh.triangle(t);
    for e in 0..3 {
      sum += p[e].distance(p[(e + 1) % 3]) as f64;
    }
  }
  let scale = (tc as f64 * 3.0 / sum) as f32;
  for v in &mut mesh.vertices {
    v.position *= scale;
  }
  info!(scale, "mesh scale normalized");
  scale
}

/// Simplification target profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimplifyProfile {
  /// Preserve visual fidelity and UV-ready topology.
  Render,
  /// Coarse mesh for pathing.
  Navigation,
  /// Coarsest, position-only mesh.
  Collider,
}

/// External decimation capability: accepts a mesh, returns a mesh with
/// fewer or equal triangles, preserving the outer silhouette where
/// feasible.
pub trait Decimator {
  fn simplify(&self, mesh: &Mesh, profile: SimplifyProfile, target_triangles: usize)
    -> Result<Mesh>;
}

/// Built-in uniform vertex-clustering decimator.
pub struct ClusterDecimator;

impl ClusterDecimator {
  /// Cluster lattice resolution for a surface-like mesh with the given
  /// triangle budget.
  fn lattice_dim(target_triangles: usize) -> usize {
    ((target_triangles as f32 / 6.0).sqrt().ceil() as usize).clamp(2, 1024)
  }
}

impl Decimator for ClusterDecimator {
  fn simplify(
    &self,
    mesh: &Mesh,
    profile: SimplifyProfile,
    target_triangles: usize,
  ) -> Result<Mesh> {
    if mesh.triangle_count() <= target_triangles {
      return Ok(mesh.clone());
    }

    let (min, max) = mesh.bounds();
    let extent = (max - min).max(Vec3::splat(1e-6));
    let dim = Self::lattice_dim(target_triangles);
    let cell = extent / dim as f32;

    // Assign every vertex to a lattice cluster and average its members.
    let mut clusters: HashMap<[u32; 3], u32> = HashMap::new();
    let mut vertex_to_cluster = Vec::with_capacity(mesh.vertices.len());
    let mut sums: Vec<(Vec3, Vec3, u32)> = Vec::new();
    for v in &mesh.vertices {
      let q = ((v.position - min) / cell).floor();
      let key = [
        (q.x as u32).min(dim as u32 - 1),
        (q.y as u32).min(dim as u32 - 1),
        (q.z as u32).min(dim as u32 - 1),
      ];
      let id = *clusters.entry(key).or_insert_with(|| {
        sums.push((Vec3::ZERO, Vec3::ZERO, 0));
        (sums.len() - 1) as u32
      });
      let entry = &mut sums[id as usize];
      entry.0 += v.position;
      entry.1 += v.normal;
      entry.2 += 1;
      vertex_to_cluster.push(id);
    }

    let vertices: Vec<Vertex> = sums
      .iter()
      .map(|&(pos, nrm, count)| Vertex {
        position: pos / count as f32,
        normal: nrm.normalize_or_zero(),
        uv: glam::Vec2::ZERO,
      })
      .collect();

    // Drop triangles that collapsed onto fewer than three clusters.
    let mut indices = Vec::new();
    for t in 0..mesh.triangle_count() {
      let a = vertex_to_cluster[mesh.indices[t * 3] as usize];
      let b = vertex_to_cluster[mesh.indices[t * 3 + 1] as usize];
      let c = vertex_to_cluster[mesh.indices[t * 3 + 2] as usize];
      if a != b && b != c && a != c {
        indices.extend_from_slice(&[a, b, c]);
      }
    }

    let out = Mesh { vertices, indices };
    if out.is_empty() {
      return Err(Error::Decimation(format!(
        "{profile:?} profile collapsed the mesh to nothing"
      )));
    }
    // Contract: never increase the triangle count.
    if out.triangle_count() > mesh.triangle_count() {
      return Ok(mesh.clone());
    }
    debug!(
      ?profile,
      before = mesh.triangle_count(),
      after = out.triangle_count(),
      "mesh simplified"
    );
    Ok(out)
  }
}

/// Split a mesh into spatially local, self-contained chunks of at most
/// `max_triangles` triangles each.
pub fn split_chunks(mesh: &Mesh, max_triangles: usize) -> Vec<Mesh> {
  let mut triangles: Vec<u32> = (0..mesh.triangle_count() as u32).collect();
  let mut chunks = Vec::new();
  split_recursive(mesh, &mut triangles, max_triangles, &mut chunks);
  info!(chunks = chunks.len(), "render mesh split");
  chunks
}

fn split_recursive(mesh: &Mesh, triangles: &mut [u32], max: usize, out: &mut Vec<Mesh>) {
  if triangles.len() <= max {
    if !triangles.is_empty() {
      out.push(submesh(mesh, triangles));
    }
    return;
  }

  // Median split along the longest axis of the centroid bounds.
  let centroid = |t: u32| -> Vec3 {
    let p = mesh.triangle(t as usize);
    (p[0] + p[1] + p[2]) / 3.0
  };
  let mut min = Vec3::splat(f32::INFINITY);
  let mut max_b = Vec3::splat(f32::NEG_INFINITY);
  for &t in triangles.iter() {
    let c = centroid(t);
    min = min.min(c);
    max_b = max_b.max(c);
  }
  let extent = max_b - min;
  let axis = if extent.x >= extent.y && extent.x >= extent.z {
    0
  } else if extent.y >= extent.z {
    1
  } else {
    2
  };

  let mid = triangles.len() / 2;
  triangles.select_nth_unstable_by(mid, |&a, &b| {
    centroid(a)[axis]
      .partial_cmp(&centroid(b)[axis])
      .unwrap_or(std::cmp::Ordering::Equal)
  });
  let (left, right) = triangles.split_at_mut(mid);
  split_recursive(mesh, left, max, out);
  split_recursive(mesh, right, max, out);
}

/// Extract the given triangles into a self-contained mesh with compacted
/// vertices.
fn submesh(mesh: &Mesh, triangles: &[u32]) -> Mesh {
  let mut remap: HashMap<u32, u32> = HashMap::new();
  let mut vertices = Vec::new();
  let mut indices = Vec::with_capacity(triangles.len() * 3);
  for &t in triangles {
    for e in 0..3 {
      let old = mesh.indices[t as usize * 3 + e];
      let new = *remap.entry(old).or_insert_with(|| {
        vertices.push(mesh.vertices[old as usize]);
        (vertices.len() - 1) as u32
      });
      indices.push(new);
    }
  }
  Mesh { vertices, indices }
}

#[cfg(test)]
#[path = "process_test.rs"]
mod process_test;
