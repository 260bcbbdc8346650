//! Terrain density field evaluation.
//!
//! A planet is the zero level set of `sdf_land`: a base shape SDF displaced
//! by an elevation field. All functions are referentially transparent; the
//! only state are the noise generators built once per seed and only read
//! afterwards, so a `TerrainField` can be shared across threads.
//!
//! The unit cube [-1,1]³ sampled by the density grid maps to metric space
//! through `METERS_PER_UNIT`, keeping the noise frequencies and elevation
//! amplitudes in the units they were tuned for.

mod elevation;
mod shapes;
mod util;

pub use elevation::ElevationMode;
pub use shapes::ShapeMode;

use glam::Vec3;

use crate::config::ResolvedConfig;
use crate::error::{Error, Result};
use elevation::ElevationField;

/// Scale from unit-cube coordinates to metric coordinates.
pub const METERS_PER_UNIT: f32 = 1000.0;

/// Ratio between mesh units and elevation units.
const ELEVATION_RATIO: f32 = 10.0;

/// Derive a per-generator noise seed from the process seed.
pub(crate) fn noise_seed(seed: u64, salt: i32) -> i32 {
  (seed as i32) ^ salt
}

/// The selected shape + elevation field pair.
pub struct TerrainField {
  shape: ShapeMode,
  elevation: ElevationField,
}

impl TerrainField {
  pub fn new(cfg: &ResolvedConfig) -> Self {
    Self {
      shape: cfg.shape,
      elevation: ElevationField::new(cfg.elevation, cfg.seed),
    }
  }

  fn check(value: f32, stage: &'static str) -> Result<f32> {
    if value.is_finite() {
      Ok(value)
    } else {
      Err(Error::NonFinite { stage })
    }
  }

  /// Base shape SDF in metric units. Negative inside the body.
  pub fn sdf_shape(&self, p: Vec3) -> Result<f32> {
    Self::check(self.shape.evaluate(p * METERS_PER_UNIT), "shape sdf")
  }

  /// Raw elevation displacement at a point.
  pub fn elevation_raw(&self, p: Vec3) -> Result<f32> {
    Self::check(self.elevation.evaluate(p * METERS_PER_UNIT), "elevation sdf")
  }

  /// Shape SDF expressed in elevation units.
  pub fn sdf_elevation(&self, p: Vec3) -> Result<f32> {
    Ok(self.sdf_shape(p)? * ELEVATION_RATIO)
  }

  /// Solid terrain: the shape displaced by elevation. The generated
  /// surface is the zero crossing of this field.
  pub fn sdf_land(&self, p: Vec3) -> Result<f32> {
    Ok(self.sdf_shape(p)? - self.elevation_raw(p)? / ELEVATION_RATIO)
  }

  /// Water level: the undisplaced shape.
  pub fn sdf_water(&self, p: Vec3) -> Result<f32> {
    self.sdf_shape(p)
  }

  /// Navigation field: only positive elevation carves into the shape, so
  /// pathing ignores underwater depressions.
  pub fn sdf_navigation(&self, p: Vec3) -> Result<f32> {
    let elev = self.elevation_raw(p)? / ELEVATION_RATIO;
    Ok(self.sdf_shape(p)? - elev.max(0.0))
  }
}
