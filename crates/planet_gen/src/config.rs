//! Generation configuration.
//!
//! `GenConfig` is the raw, serde-deserialized surface (loaded from TOML by
//! the CLI). `resolve()` validates mode names up front - before any field
//! sampling - and pins down the `"random"` shape selection so that re-runs
//! and exports are reproducible. The resolved configuration is read-only
//! for the rest of the run and is shared across worker threads by
//! reference.

use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::field::{ElevationMode, ShapeMode};

/// Raw configuration surface consumed by the pipeline.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
  /// Shape registry name, or "random" for a seeded uniform draw.
  pub shape_mode: String,
  /// Elevation registry name.
  pub elevation_mode: String,
  /// Process-wide noise seed. All generators derive from it.
  pub seed: u64,
  /// Density grid resolution N (the grid holds N³ samples).
  pub resolution: usize,
  /// Atlas packing density in texels per world unit.
  pub texels_per_unit: f32,
  /// Padding between packed charts, in texels.
  pub padding: u32,
  /// Reserve an extra texel ring for bilinear sampling.
  pub bilinear: bool,
  /// Align chart placement to 4-texel blocks.
  pub block_align: bool,
  /// Integer upscale from atlas resolution to texture resolution.
  pub texture_upscale: u32,
  /// Maximum triangles per render chunk.
  pub chunk_triangle_budget: usize,
  /// Target triangle count for the render mesh.
  pub render_triangle_budget: usize,
  /// Target triangle count for the navigation mesh.
  pub navigation_triangle_budget: usize,
  /// Target triangle count for the collider mesh.
  pub collider_triangle_budget: usize,
  /// Keep a copy of the middle density slice for debug dumps.
  pub debug_dump: bool,
}

impl Default for GenConfig {
  fn default() -> Self {
    Self {
      shape_mode: "random".into(),
      elevation_mode: "legacy".into(),
      seed: 0,
      resolution: 40,
      texels_per_unit: 0.1,
      padding: 2,
      bilinear: true,
      block_align: true,
      texture_upscale: 2,
      chunk_triangle_budget: 4000,
      render_triangle_budget: 30_000,
      navigation_triangle_budget: 6000,
      collider_triangle_budget: 2500,
      debug_dump: false,
    }
  }
}

impl GenConfig {
  /// Validate mode names and fix the random shape selection.
  pub fn resolve(&self) -> Result<ResolvedConfig> {
    let shape = if self.shape_mode == "random" {
      let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
      let shape = ShapeMode::ALL[rng.random_range(0..ShapeMode::ALL.len())];
      info!(shape = shape.name(), "randomly chosen shape mode");
      shape
    } else {
      let shape = ShapeMode::from_name(&self.shape_mode)?;
      info!(shape = shape.name(), "using shape mode");
      shape
    };
    let elevation = ElevationMode::from_name(&self.elevation_mode)?;
    info!(elevation = elevation.name(), "using elevation mode");

    Ok(ResolvedConfig {
      shape,
      elevation,
      seed: self.seed,
      resolution: self.resolution,
      texels_per_unit: self.texels_per_unit,
      padding: self.padding,
      bilinear: self.bilinear,
      block_align: self.block_align,
      texture_upscale: self.texture_upscale.max(1),
      chunk_triangle_budget: self.chunk_triangle_budget.max(1),
      render_triangle_budget: self.render_triangle_budget,
      navigation_triangle_budget: self.navigation_triangle_budget,
      collider_triangle_budget: self.collider_triangle_budget,
      debug_dump: self.debug_dump,
    })
  }
}

/// Validated, immutable configuration. Safe for concurrent reads.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
  pub shape: ShapeMode,
  pub elevation: ElevationMode,
  pub seed: u64,
  pub resolution: usize,
  pub texels_per_unit: f32,
  pub padding: u32,
  pub bilinear: bool,
  pub block_align: bool,
  pub texture_upscale: u32,
  pub chunk_triangle_budget: usize,
  pub render_triangle_budget: usize,
  pub navigation_triangle_budget: usize,
  pub collider_triangle_budget: usize,
  pub debug_dump: bool,
}

impl ResolvedConfig {
  /// The persisted shape name (after any random selection).
  pub fn shape_name(&self) -> &'static str {
    self.shape.name()
  }

  pub fn elevation_name(&self) -> &'static str {
    self.elevation.name()
  }
}
