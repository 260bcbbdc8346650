//! Pluggable material evaluation.
//!
//! The synthesizer only needs something that maps a surface sample
//! (position, normal) to channel values; [`TerrainMaterial`] is the
//! built-in noise-driven evaluator. Positions arrive in normalized mesh
//! units (mean edge length 1).

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use glam::Vec3;

use crate::field::noise_seed;

/// Number of terrain path types.
pub const PATH_TYPE_COUNT: u32 = 8;

/// Per-sample channel evaluation, called once per covered texel.
pub trait MaterialEval: Sync {
  /// Surface color plus the (roughness, metallic) pair.
  fn material(&self, position: Vec3, normal: Vec3) -> ([f32; 3], [f32; 2]);

  /// Displacement channel value.
  fn height(&self, position: Vec3, normal: Vec3) -> f32;

  /// Navigation path classification: terrain type id and traversal
  /// difficulty in [0,1].
  fn path_property(&self, position: Vec3, normal: Vec3) -> (u32, f32);
}

/// Built-in terrain look: a biome palette blended by low-frequency
/// noise, with slope-driven rock exposure.
pub struct TerrainMaterial {
  biome: FastNoiseLite,
  detail: FastNoiseLite,
  relief: FastNoiseLite,
}

const BIOME_COLORS: [[f32; 3]; 4] = [
  [0.75, 0.68, 0.50], // sand
  [0.25, 0.46, 0.18], // grass
  [0.36, 0.32, 0.30], // rock
  [0.88, 0.90, 0.92], // snow
];

impl TerrainMaterial {
  pub fn new(seed: u64) -> Self {
    let mut biome = FastNoiseLite::with_seed(noise_seed(seed, 0x7E01));
    biome.set_noise_type(Some(NoiseType::Perlin));
    biome.set_frequency(Some(0.08));

    let mut detail = FastNoiseLite::with_seed(noise_seed(seed, 0x7E02));
    detail.set_noise_type(Some(NoiseType::OpenSimplex2));
    detail.set_fractal_type(Some(FractalType::FBm));
    detail.set_fractal_octaves(Some(4));
    detail.set_frequency(Some(0.6));

    let mut relief = FastNoiseLite::with_seed(noise_seed(seed, 0x7E03));
    relief.set_noise_type(Some(NoiseType::OpenSimplex2));
    relief.set_fractal_type(Some(FractalType::Ridged));
    relief.set_fractal_octaves(Some(3));
    relief.set_frequency(Some(0.25));

    Self {
      biome,
      detail,
      relief,
    }
  }

  /// Biome blend factor in [0,1].
  fn biome_factor(&self, p: Vec3) -> f32 {
    self.biome.get_noise_3d(p.x, p.y, p.z) * 0.5 + 0.5
  }

  /// Up-facing surfaces read 0, cliffs read 1.
  fn slope(normal: Vec3) -> f32 {
    1.0 - normal.y.clamp(-1.0, 1.0).max(0.0)
  }
}

impl MaterialEval for TerrainMaterial {
  fn material(&self, position: Vec3, normal: Vec3) -> ([f32; 3], [f32; 2]) {
    let t = self.biome_factor(position) * (BIOME_COLORS.len() - 1) as f32;
    let lower = (t as usize).min(BIOME_COLORS.len() - 2);
    let frac = t - lower as f32;
    let a = Vec3::from(BIOME_COLORS[lower]);
    let b = Vec3::from(BIOME_COLORS[lower + 1]);
    let mut color = a.lerp(b, frac);

    // Steep faces expose rock regardless of biome.
    let slope = Self::slope(normal);
    color = color.lerp(Vec3::from(BIOME_COLORS[2]), (slope * 1.6 - 0.4).clamp(0.0, 1.0));

    // Small-scale brightness variation so flat regions do not band.
    let detail = self
      .detail
      .get_noise_3d(position.x, position.y, position.z);
    color = (color * (1.0 + detail * 0.12)).clamp(Vec3::ZERO, Vec3::ONE);

    let roughness = (0.9 - slope * 0.35).clamp(0.0, 1.0);
    let metallic = 0.0;
    (color.to_array(), [roughness, metallic])
  }

  fn height(&self, position: Vec3, _normal: Vec3) -> f32 {
    let h = self
      .relief
      .get_noise_3d(position.x, position.y, position.z);
    (h * 0.5 + 0.5).clamp(0.0, 1.0)
  }

  fn path_property(&self, position: Vec3, normal: Vec3) -> (u32, f32) {
    let t = self.biome_factor(position) * PATH_TYPE_COUNT as f32;
    let kind = (t as u32).min(PATH_TYPE_COUNT - 1);
    let difficulty = Self::slope(normal).clamp(0.0, 1.0);
    (kind, difficulty)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn evaluation_is_deterministic_per_seed() {
    let a = TerrainMaterial::new(11);
    let b = TerrainMaterial::new(11);
    let p = Vec3::new(3.0, -2.0, 7.5);
    let n = Vec3::new(0.0, 1.0, 0.0);
    assert_eq!(a.material(p, n), b.material(p, n));
    assert_eq!(a.height(p, n), b.height(p, n));
    assert_eq!(a.path_property(p, n), b.path_property(p, n));
  }

  #[test]
  fn channels_stay_in_unit_range() {
    let m = TerrainMaterial::new(5);
    for i in 0..64 {
      let p = Vec3::new(i as f32 * 1.7, (i % 7) as f32, -(i as f32) * 0.3);
      let n = Vec3::new((i % 3) as f32 - 1.0, 1.0, 0.5).normalize();
      let (albedo, special) = m.material(p, n);
      for v in albedo.iter().chain(special.iter()) {
        assert!((0.0..=1.0).contains(v), "channel {v} out of range at {p}");
      }
      assert!((0.0..=1.0).contains(&m.height(p, n)));
      let (kind, difficulty) = m.path_property(p, n);
      assert!(kind < PATH_TYPE_COUNT);
      assert!((0.0..=1.0).contains(&difficulty));
    }
  }

  #[test]
  fn cliffs_are_harder_than_plains() {
    let m = TerrainMaterial::new(1);
    let p = Vec3::ZERO;
    let (_, flat) = m.path_property(p, Vec3::Y);
    let (_, steep) = m.path_property(p, Vec3::X);
    assert!(steep > flat);
  }
}
