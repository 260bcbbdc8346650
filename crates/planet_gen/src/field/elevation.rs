//! Elevation field registry.
//!
//! Each mode composes fractal noise into an elevation displacement in
//! metric units. Positive values raise terrain above the water shape,
//! negative values sink it. The lakes/islands modes share a "mountains"
//! layer: a mask noise selects between ridged peaks and terraced mesas,
//! both fading out under water.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use glam::Vec3;

use super::noise_seed;
use super::util::{saturate, smooth_max, smoothstep, terrace};
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElevationMode {
  None,
  Simple,
  Legacy,
  Lakes,
  Islands,
}

impl ElevationMode {
  pub const ALL: &'static [ElevationMode] = &[
    ElevationMode::None,
    ElevationMode::Simple,
    ElevationMode::Legacy,
    ElevationMode::Lakes,
    ElevationMode::Islands,
  ];

  pub fn name(self) -> &'static str {
    match self {
      ElevationMode::None => "none",
      ElevationMode::Simple => "simple",
      ElevationMode::Legacy => "legacy",
      ElevationMode::Lakes => "lakes",
      ElevationMode::Islands => "islands",
    }
  }

  pub fn from_name(name: &str) -> Result<ElevationMode> {
    Self::ALL
      .iter()
      .copied()
      .find(|m| m.name() == name)
      .ok_or_else(|| Error::UnknownElevationMode(name.to_owned()))
  }
}

/// Shared ridge/terrace layer for the lake and island modes.
struct Mountains {
  mask: FastNoiseLite,
  ridge: FastNoiseLite,
  terraces: FastNoiseLite,
}

impl Mountains {
  fn new(seed: u64) -> Self {
    let mut mask = FastNoiseLite::with_seed(noise_seed(seed, 0x5EED_03));
    mask.set_noise_type(Some(NoiseType::Perlin));
    mask.set_frequency(Some(0.0015));

    let mut ridge = FastNoiseLite::with_seed(noise_seed(seed, 0x5EED_04));
    ridge.set_noise_type(Some(NoiseType::OpenSimplex2));
    ridge.set_fractal_type(Some(FractalType::Ridged));
    ridge.set_fractal_octaves(Some(4));
    ridge.set_fractal_lacunarity(Some(1.5));
    ridge.set_fractal_gain(Some(-0.4));
    ridge.set_frequency(Some(0.001));

    let mut terraces = FastNoiseLite::with_seed(noise_seed(seed, 0x5EED_05));
    terraces.set_noise_type(Some(NoiseType::Perlin));
    terraces.set_fractal_type(Some(FractalType::FBm));
    terraces.set_fractal_octaves(Some(3));
    terraces.set_fractal_gain(Some(0.3));
    terraces.set_frequency(Some(0.002));

    Self {
      mask,
      ridge,
      terraces,
    }
  }

  fn apply(&self, p: Vec3, land: f32) -> f32 {
    // No mountains in the water.
    let cover = 1.0 - saturate(land * -0.1);
    if cover < 1e-7 {
      return land;
    }

    let mask = self.mask.get_noise_3d(p.x, p.y, p.z);
    let rm = smoothstep(saturate(mask * 7.0 - 0.3));
    let tm = smoothstep(saturate(mask * -7.0 - 1.5));

    let mut ridge = self.ridge.get_noise_3d(p.x, p.y, p.z);
    ridge = (ridge - 0.1).max(0.0);
    ridge = ridge.powf(1.6);
    ridge *= rm * cover;
    ridge *= 1000.0;

    let mut terraces = self.terraces.get_noise_3d(p.x, p.y, p.z);
    terraces = (terraces + 0.1).max(0.0) * 2.5;
    terraces = terrace(terraces, 4.0);
    terraces *= tm * cover;
    terraces *= 250.0;

    land + smooth_max(0.0, ridge.max(terraces), 50.0)
  }
}

/// Built noise generators for the selected mode. Read-only after
/// construction, hence safe to evaluate from any thread.
pub(super) struct ElevationField {
  mode: ElevationMode,
  elev: Option<FastNoiseLite>,
  scale: Option<FastNoiseLite>,
  mountains: Option<Mountains>,
}

impl ElevationField {
  pub(super) fn new(mode: ElevationMode, seed: u64) -> Self {
    let elev = match mode {
      ElevationMode::None => None,
      ElevationMode::Simple => {
        let mut n = FastNoiseLite::with_seed(noise_seed(seed, 0x5EED_01));
        n.set_noise_type(Some(NoiseType::OpenSimplex2));
        n.set_fractal_type(Some(FractalType::Ridged));
        n.set_fractal_octaves(Some(6));
        n.set_fractal_gain(Some(0.4));
        n.set_frequency(Some(0.0005));
        Some(n)
      }
      ElevationMode::Legacy => {
        let mut n = FastNoiseLite::with_seed(noise_seed(seed, 0x5EED_01));
        n.set_noise_type(Some(NoiseType::Value));
        n.set_fractal_type(Some(FractalType::FBm));
        n.set_fractal_octaves(Some(4));
        Some(n)
      }
      ElevationMode::Lakes | ElevationMode::Islands => {
        let mut n = FastNoiseLite::with_seed(noise_seed(seed, 0x5EED_01));
        n.set_noise_type(Some(NoiseType::Value));
        n.set_fractal_type(Some(FractalType::FBm));
        n.set_fractal_octaves(Some(4));
        n.set_frequency(Some(0.0013));
        Some(n)
      }
    };

    let scale = match mode {
      ElevationMode::Legacy => {
        let mut n = FastNoiseLite::with_seed(noise_seed(seed, 0x5EED_02));
        n.set_noise_type(Some(NoiseType::Value));
        n.set_fractal_type(Some(FractalType::FBm));
        n.set_fractal_octaves(Some(4));
        n.set_frequency(Some(0.0005));
        Some(n)
      }
      _ => None,
    };

    let mountains = match mode {
      ElevationMode::Lakes | ElevationMode::Islands => Some(Mountains::new(seed)),
      _ => None,
    };

    Self {
      mode,
      elev,
      scale,
      mountains,
    }
  }

  pub(super) fn evaluate(&self, p: Vec3) -> f32 {
    match self.mode {
      ElevationMode::None => 100.0,
      ElevationMode::Simple => {
        let n = self.elev.as_ref().map(|n| n.get_noise_3d(p.x, p.y, p.z));
        let mut a = n.unwrap_or(0.0);
        a = -a + 0.3;
        a = (a * 1.3 - 0.35).powi(3) + 0.1;
        100.0 - a * 1000.0
      }
      ElevationMode::Legacy => {
        let sn = self.scale.as_ref().map(|n| n.get_noise_3d(p.x, p.y, p.z));
        let scale = sn.unwrap_or(0.0) * 0.0005 + 0.0015;
        let q = p * scale;
        let mut a = self
          .elev
          .as_ref()
          .map(|n| n.get_noise_3d(q.x, q.y, q.z))
          .unwrap_or(0.0);
        // Slightly prefer terrain over ocean.
        a += 0.11;
        a = if a < 0.0 {
          -(-a).powf(0.85)
        } else {
          a.powf(1.7)
        };
        a * 2500.0
      }
      ElevationMode::Lakes => self.lakes_islands(p, 1.24),
      ElevationMode::Islands => self.lakes_islands(p, 0.83),
    }
  }

  fn lakes_islands(&self, p: Vec3, exponent: f32) -> f32 {
    let n = self
      .elev
      .as_ref()
      .map(|n| n.get_noise_3d(p.x, p.y, p.z))
      .unwrap_or(0.0);
    let mut land = saturate(n * 0.5 + 0.5);
    land = 1.0 - land.powf(exponent);
    land = land * 2.0 - 1.0;
    land = land / (land.abs() + 0.17) + 0.15;
    land *= 150.0;
    match &self.mountains {
      Some(m) => m.apply(p, land),
      None => land,
    }
  }
}
