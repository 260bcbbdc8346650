//! Scanline triangle rasterization in texel space.
//!
//! Classic two-half scanline fill: sort the corners by y, cut the
//! triangle at the middle vertex's scanline, and for every covered row
//! interpolate the x-intercepts of the long edge and the active short
//! edge, filling the span between them. Attribute recovery happens per
//! pixel via barycentric coordinates against the float UV triangle, not
//! the integer corners, so shared edges between triangles agree.

use glam::{IVec2, Vec2, Vec3};

use crate::error::{Error, Result};

/// Barycentric coordinates of `p` against triangle `(a, b, c)`.
///
/// Degenerate triangles yield non-finite components; callers treat those
/// as fatal since they indicate broken parameterization.
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Result<Vec3> {
  let u = Vec3::new(c.x - a.x, b.x - a.x, a.x - p.x)
    .cross(Vec3::new(c.y - a.y, b.y - a.y, a.y - p.y));
  let bary = if u.z.abs() < 1e-12 {
    Vec3::NAN
  } else {
    Vec3::new(1.0 - (u.x + u.y) / u.z, u.y / u.z, u.x / u.z)
  };
  if bary.is_finite() {
    Ok(bary)
  } else {
    Err(Error::NonFinite {
      stage: "barycentric rasterization",
    })
  }
}

/// Fill every pixel covered by the integer triangle `t`, invoking
/// `span(x, y)` per pixel. Rows run bottom-up, spans left-to-right.
pub fn fill_triangle<F>(mut t: [IVec2; 3], mut span: F) -> Result<()>
where
  F: FnMut(i32, i32) -> Result<()>,
{
  // Sort by y so t[0] is the bottom corner and t[2] the top.
  if t[0].y > t[1].y {
    t.swap(0, 1);
  }
  if t[0].y > t[2].y {
    t.swap(0, 2);
  }
  if t[1].y > t[2].y {
    t.swap(1, 2);
  }
  let total_height = t[2].y - t[0].y;
  if total_height == 0 {
    return Ok(());
  }

  for i in 0..=total_height {
    let second_half = i > t[1].y - t[0].y || t[1].y == t[0].y;
    let segment_height = if second_half {
      t[2].y - t[1].y
    } else {
      t[1].y - t[0].y
    };
    let alpha = i as f32 / total_height as f32;
    let beta = if second_half {
      (i - (t[1].y - t[0].y)) as f32 / segment_height as f32
    } else {
      i as f32 / segment_height as f32
    };
    let mut ax = t[0].x as f32 + (t[2].x - t[0].x) as f32 * alpha;
    let mut bx = if second_half {
      t[1].x as f32 + (t[2].x - t[1].x) as f32 * beta
    } else {
      t[0].x as f32 + (t[1].x - t[0].x) as f32 * beta
    };
    if ax > bx {
      std::mem::swap(&mut ax, &mut bx);
    }
    let y = t[0].y + i;
    for x in ax as i32..=bx as i32 {
      span(x, y)?;
    }
  }
  Ok(())
}
