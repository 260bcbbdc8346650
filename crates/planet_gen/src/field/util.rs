//! Scalar shaping helpers for shape and elevation evaluation.

pub fn saturate(x: f32) -> f32 {
  x.clamp(0.0, 1.0)
}

/// Hermite smoothstep on an already-saturated input.
pub fn smoothstep(x: f32) -> f32 {
  x * x * (3.0 - 2.0 * x)
}

/// Quantize into `steps` plateaus with smoothed risers.
pub fn terrace(x: f32, steps: f32) -> f32 {
  let x = x * steps;
  let whole = x.floor();
  (whole + smoothstep(x - whole)) / steps
}

/// Polynomial smooth minimum with blending radius `k`.
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
  let h = (k - (a - b).abs()).max(0.0) / k;
  a.min(b) - h * h * k * 0.25
}

/// Smooth maximum; dual of [`smooth_min`].
pub fn smooth_max(a: f32, b: f32, k: f32) -> f32 {
  -smooth_min(-a, -b, k)
}
