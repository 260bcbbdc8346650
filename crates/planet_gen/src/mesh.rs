//! Core mesh types.
//!
//! A `Mesh` is produced once by extraction and then exclusively owned and
//! progressively mutated (scaled, normal-fixed, UV-assigned) through the
//! pipeline until it is split into chunks. Concurrent branches take their
//! own copies; no shared-mutable mesh crosses a thread boundary.

use glam::{Vec2, Vec3};

/// Output vertex with all mesh attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  pub position: Vec3,
  pub normal: Vec3,
  pub uv: Vec2,
}

impl Vertex {
  pub fn at(position: Vec3) -> Self {
    Self {
      position,
      normal: Vec3::ZERO,
      uv: Vec2::ZERO,
    }
  }
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
  pub vertices: Vec<Vertex>,
  /// Triangle indices (3 per triangle); every index < vertex count.
  pub indices: Vec<u32>,
}

impl Mesh {
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty() || self.indices.is_empty()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Check the index-validity invariant.
  pub fn indices_valid(&self) -> bool {
    let count = self.vertices.len() as u32;
    self.indices.len() % 3 == 0 && self.indices.iter().all(|&i| i < count)
  }

  /// Axis-aligned bounds over all vertex positions.
  pub fn bounds(&self) -> (Vec3, Vec3) {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for v in &self.vertices {
      min = min.min(v.position);
      max = max.max(v.position);
    }
    (min, max)
  }

  /// Positions of one triangle's corners.
  #[inline]
  pub fn triangle(&self, t: usize) -> [Vec3; 3] {
    [
      self.vertices[self.indices[t * 3] as usize].position,
      self.vertices[self.indices[t * 3 + 1] as usize].position,
      self.vertices[self.indices[t * 3 + 2] as usize].position,
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn quad_mesh() -> Mesh {
    Mesh {
      vertices: vec![
        Vertex::at(Vec3::new(0.0, 0.0, 0.0)),
        Vertex::at(Vec3::new(1.0, 0.0, 0.0)),
        Vertex::at(Vec3::new(1.0, 1.0, 0.0)),
        Vertex::at(Vec3::new(0.0, 1.0, 0.0)),
      ],
      indices: vec![0, 1, 2, 0, 2, 3],
    }
  }

  #[test]
  fn counts_and_validity() {
    let m = quad_mesh();
    assert_eq!(m.triangle_count(), 2);
    assert!(m.indices_valid());
    assert!(!m.is_empty());
  }

  #[test]
  fn out_of_range_index_detected() {
    let mut m = quad_mesh();
    m.indices[0] = 9;
    assert!(!m.indices_valid());
  }

  #[test]
  fn bounds_cover_all_vertices() {
    let (min, max) = quad_mesh().bounds();
    assert_eq!(min, Vec3::ZERO);
    assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
  }
}
