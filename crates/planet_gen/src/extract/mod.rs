//! Dual-contouring isosurface extraction.
//!
//! Two stages:
//!
//! 1. [`extract`] walks every 2×2×2 cell of the density grid, places one
//!    vertex per sign-change cell at the centroid of its edge crossings,
//!    and emits one ring-ordered quad per active minimal edge of the dual
//!    lattice.
//! 2. [`triangulate`] remaps vertices from grid index space to the [-1,1]³
//!    domain, splits each quad along its **shorter diagonal** to avoid
//!    degenerate slivers, and accumulates angle-unweighted face normals
//!    into unit vertex normals.
//!
//! An all-solid or all-empty grid produces no quads; `triangulate` reports
//! that as a fatal [`Error::EmptyMesh`].

use glam::Vec3;
use tracing::info;

use crate::error::{Error, Result};
use crate::grid::DensityGrid;
use crate::mesh::{Mesh, Vertex};

/// Corner offsets within a cell; corner i = (x=bit0, y=bit1, z=bit2).
const CORNER_OFFSETS: [[usize; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [0, 1, 0],
  [1, 1, 0],
  [0, 0, 1],
  [1, 0, 1],
  [0, 1, 1],
  [1, 1, 1],
];

/// Precomputed corner positions within the unit cell.
const CORNER_POSITIONS: [Vec3; 8] = [
  Vec3::new(0.0, 0.0, 0.0),
  Vec3::new(1.0, 0.0, 0.0),
  Vec3::new(0.0, 1.0, 0.0),
  Vec3::new(1.0, 1.0, 0.0),
  Vec3::new(0.0, 0.0, 1.0),
  Vec3::new(1.0, 0.0, 1.0),
  Vec3::new(0.0, 1.0, 1.0),
  Vec3::new(1.0, 1.0, 1.0),
];

/// The 12 cube edges as corner index pairs.
const CUBE_EDGES: [[usize; 2]; 12] = [
  [0, 1],
  [0, 2],
  [0, 4],
  [1, 3],
  [1, 5],
  [2, 3],
  [2, 6],
  [3, 7],
  [4, 5],
  [4, 6],
  [5, 7],
  [6, 7],
];

/// Quad-dominant dual mesh in grid index space.
#[derive(Default)]
pub struct QuadMesh {
  /// Dual vertices, one per surface-crossing cell.
  pub positions: Vec<Vec3>,
  /// Ring-ordered quads; opposite corners are (0,2) and (1,3).
  pub quads: Vec<[u32; 4]>,
}

/// Cell → vertex index lookup for quad stitching.
struct IndexGrid {
  n: usize,
  data: Vec<i32>,
}

impl IndexGrid {
  fn new(n: usize) -> Self {
    Self {
      n,
      data: vec![-1; n * n * n],
    }
  }

  #[inline]
  fn get(&self, x: usize, y: usize, z: usize) -> i32 {
    self.data[(z * self.n + y) * self.n + x]
  }

  #[inline]
  fn set(&mut self, x: usize, y: usize, z: usize, value: i32) {
    self.data[(z * self.n + y) * self.n + x] = value;
  }
}

/// Centroid of the cell's edge crossing points.
#[inline]
fn crossing_centroid(samples: &[f32; 8]) -> Vec3 {
  let mut sum = Vec3::ZERO;
  let mut count = 0u32;

  for &[c0, c1] in &CUBE_EDGES {
    let s0 = samples[c0];
    let s1 = samples[c1];
    if (s0 < 0.0) != (s1 < 0.0) {
      let t = s0 / (s0 - s1);
      sum += CORNER_POSITIONS[c0].lerp(CORNER_POSITIONS[c1], t);
      count += 1;
    }
  }

  if count == 0 {
    return Vec3::splat(0.5);
  }
  sum / count as f32
}

/// Dual-contour the density grid at the given isovalue.
pub fn extract(grid: &DensityGrid, iso: f32) -> QuadMesh {
  let n = grid.resolution();
  let mut out = QuadMesh::default();
  let mut cells = IndexGrid::new(n);

  for z in 0..n - 1 {
    for y in 0..n - 1 {
      for x in 0..n - 1 {
        let samples: [f32; 8] = std::array::from_fn(|i| {
          let [dx, dy, dz] = CORNER_OFFSETS[i];
          grid.value(x + dx, y + dy, z + dz) - iso
        });

        let mut corner_mask = 0u8;
        for (i, &s) in samples.iter().enumerate() {
          if s < 0.0 {
            corner_mask |= 1 << i;
          }
        }
        // Early exit for homogeneous cells.
        if corner_mask == 0 || corner_mask == 255 {
          continue;
        }

        let vertex_index = out.positions.len() as i32;
        cells.set(x, y, z, vertex_index);
        out.positions
          .push(Vec3::new(x as f32, y as f32, z as f32) + crossing_centroid(&samples));

        // Corner 0 outside means the quad winding must flip to keep
        // normals pointing out of the solid.
        let flip = (corner_mask & 1) == 0;

        // The three minimal edges from corner 0 (along X, Y, Z).
        for axis in 0..3 {
          let neighbor = 1usize << axis;
          if (samples[0] < 0.0) == (samples[neighbor] < 0.0) {
            continue;
          }

          let u = (axis + 1) % 3;
          let v = (axis + 2) % 3;
          let pos = [x, y, z];
          // Boundary cells have no full ring of neighbors.
          if pos[u] == 0 || pos[v] == 0 {
            continue;
          }

          let mut pos_c = pos;
          pos_c[u] -= 1;
          let mut pos_b = pos;
          pos_b[u] -= 1;
          pos_b[v] -= 1;
          let mut pos_d = pos;
          pos_d[v] -= 1;

          let a = vertex_index;
          let c = cells.get(pos_c[0], pos_c[1], pos_c[2]);
          let b = cells.get(pos_b[0], pos_b[1], pos_b[2]);
          let d = cells.get(pos_d[0], pos_d[1], pos_d[2]);
          if c < 0 || b < 0 || d < 0 {
            continue;
          }

          let quad = if flip {
            [a as u32, d as u32, b as u32, c as u32]
          } else {
            [a as u32, c as u32, b as u32, d as u32]
          };
          out.quads.push(quad);
        }
      }
    }
  }

  out
}

/// Diagonal split orders for ring-ordered quads.
const FIRST_SPLIT: [usize; 6] = [0, 1, 2, 0, 2, 3];
const SECOND_SPLIT: [usize; 6] = [1, 2, 3, 1, 3, 0];

/// Triangulate the dual mesh and finalize vertex normals.
pub fn triangulate(quad_mesh: &QuadMesh, n: usize) -> Result<Mesh> {
  if quad_mesh.positions.is_empty() || quad_mesh.quads.is_empty() {
    return Err(Error::EmptyMesh);
  }

  let mut mesh = Mesh {
    vertices: quad_mesh
      .positions
      .iter()
      .map(|&p| Vertex::at(p * 2.0 / n as f32 - Vec3::ONE))
      .collect(),
    indices: Vec::with_capacity(quad_mesh.quads.len() * 6),
  };

  for quad in &quad_mesh.quads {
    let p: [Vec3; 4] = std::array::from_fn(|i| mesh.vertices[quad[i] as usize].position);

    // Split the quad by its shorter diagonal.
    let which = p[0].distance_squared(p[2]) < p[1].distance_squared(p[3]);
    let order = if which { &FIRST_SPLIT } else { &SECOND_SPLIT };
    for &i in order {
      mesh.indices.push(quad[i]);
    }

    // Angle-unweighted face normal accumulated into all four corners.
    let normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or_zero();
    for &i in quad {
      mesh.vertices[i as usize].normal += normal;
    }
  }

  for v in &mut mesh.vertices {
    v.normal = v.normal.normalize_or_zero();
  }

  info!(
    vertices = mesh.vertices.len(),
    indices = mesh.indices.len(),
    "isosurface triangulated"
  );
  Ok(mesh)
}
