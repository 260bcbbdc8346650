//! Dense density grid sampling.
//!
//! The grid holds N³ scalars over the unit cube [-1,1]³, sampled in the
//! same index order the extractor consumes (x fastest, then y, then z).
//! Sampling parallelizes over z-slabs with rayon; any non-finite density
//! aborts the whole run. The grid is transient: it is consumed by
//! isosurface extraction and then dropped.

use glam::Vec3;
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;

pub struct DensityGrid {
  n: usize,
  values: Vec<f32>,
}

impl DensityGrid {
  /// Map a grid index to its domain-space coordinate.
  #[inline]
  pub fn domain_point(n: usize, x: usize, y: usize, z: usize) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32) * 2.0 / n as f32 - Vec3::ONE
  }

  /// Sample `field` over the N³ lattice.
  pub fn sample<F>(n: usize, field: F) -> Result<Self>
  where
    F: Fn(Vec3) -> Result<f32> + Sync,
  {
    let slabs: Vec<Vec<f32>> = (0..n)
      .into_par_iter()
      .map(|z| {
        let mut slab = Vec::with_capacity(n * n);
        for y in 0..n {
          for x in 0..n {
            slab.push(field(Self::domain_point(n, x, y, z))?);
          }
        }
        Ok(slab)
      })
      .collect::<Result<_>>()?;

    let values: Vec<f32> = slabs.into_iter().flatten().collect();
    debug!(n, samples = values.len(), "density grid sampled");
    Ok(Self { n, values })
  }

  #[inline]
  pub fn resolution(&self) -> usize {
    self.n
  }

  #[inline]
  pub fn value(&self, x: usize, y: usize, z: usize) -> f32 {
    self.values[(z * self.n + y) * self.n + x]
  }

  pub fn values(&self) -> &[f32] {
    &self.values
  }

  /// Copy of the middle z-slice, for debug dumps.
  pub fn middle_slice(&self) -> Vec<f32> {
    let z = self.n / 2;
    let start = z * self.n * self.n;
    self.values[start..start + self.n * self.n].to_vec()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_order_is_x_fastest() {
    let grid = DensityGrid::sample(4, |p| Ok(p.x * 100.0 + p.y * 10.0 + p.z)).unwrap();
    // values[1] differs from values[0] only in x.
    let a = grid.value(0, 0, 0);
    let b = grid.value(1, 0, 0);
    assert_eq!(grid.values()[0], a);
    assert_eq!(grid.values()[1], b);
    assert!((b - a - 50.0).abs() < 1e-4);
  }

  #[test]
  fn domain_mapping_spans_cube() {
    let p0 = DensityGrid::domain_point(40, 0, 0, 0);
    assert_eq!(p0, Vec3::splat(-1.0));
    let p = DensityGrid::domain_point(40, 20, 20, 20);
    assert!(p.abs().max_element() < 1e-6);
  }

  #[test]
  fn sampling_is_deterministic() {
    let f = |p: Vec3| Ok((p.x * 13.7).sin() + (p.y * 3.1).cos() * p.z);
    let a = DensityGrid::sample(16, f).unwrap();
    let b = DensityGrid::sample(16, f).unwrap();
    assert_eq!(a.values(), b.values());
  }

  #[test]
  fn non_finite_sample_aborts() {
    let result = DensityGrid::sample(8, |p| {
      if p.x > 0.5 {
        Err(crate::error::Error::NonFinite { stage: "test field" })
      } else {
        Ok(0.0)
      }
    });
    assert!(result.is_err());
  }
}
