//! Per-chunk texture synthesis.
//!
//! Every UV triangle of an atlas-mapped chunk is rasterized at the atlas
//! resolution times an integer upscale. Covered texels recover their 3D
//! position and normal by barycentric interpolation of the triangle's
//! vertex attributes, feed them to a material evaluator and store the
//! results in float channel images. Uncovered texels inside charts are
//! closed by inpainting.

mod image;
mod material;
mod raster;

pub use image::ChannelImage;
pub use material::{MaterialEval, TerrainMaterial, PATH_TYPE_COUNT};

use glam::{IVec2, Vec2};
use tracing::debug;

use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Hole-filling passes after rasterization.
pub const INPAINT_PASSES: usize = 5;

/// The synthesized channel images of one chunk.
pub struct ChunkTextures {
  /// RGB surface color.
  pub albedo: ChannelImage,
  /// Roughness and metallic.
  pub special: ChannelImage,
  /// Displacement.
  pub height: ChannelImage,
}

/// Rasterize `mesh` (with normalized [0,1) UVs) into channel images of
/// `atlas_width x atlas_height` texels scaled by `upscale`.
pub fn synthesize(
  mesh: &Mesh,
  atlas_width: u32,
  atlas_height: u32,
  upscale: u32,
  eval: &dyn MaterialEval,
) -> Result<ChunkTextures> {
  let width = atlas_width * upscale.max(1);
  let height = atlas_height * upscale.max(1);
  let mut albedo = ChannelImage::new(width, height, 3);
  let mut special = ChannelImage::new(width, height, 2);
  let mut height_map = ChannelImage::new(width, height, 1);

  // UVs map onto the last texel row/column inclusively.
  let to_texel = Vec2::new((width - 1) as f32, (height - 1) as f32);

  for t in 0..mesh.triangle_count() {
    let v = [
      mesh.vertices[mesh.indices[t * 3] as usize],
      mesh.vertices[mesh.indices[t * 3 + 1] as usize],
      mesh.vertices[mesh.indices[t * 3 + 2] as usize],
    ];
    let uv = [v[0].uv * to_texel, v[1].uv * to_texel, v[2].uv * to_texel];
    // Chart projection can flatten a sliver perpendicular to the chart
    // plane into collinear UVs. Such a triangle owns no texels of its
    // own and its barycentrics are undefined, so it is skipped rather
    // than treated as broken geometry; inpainting closes the gap.
    if (uv[1] - uv[0]).perp_dot(uv[2] - uv[0]).abs() < 1e-6 {
      continue;
    }
    let corners = [
      IVec2::new(uv[0].x as i32, uv[0].y as i32),
      IVec2::new(uv[1].x as i32, uv[1].y as i32),
      IVec2::new(uv[2].x as i32, uv[2].y as i32),
    ];

    raster::fill_triangle(corners, |x, y| {
      if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return Ok(());
      }
      let p = Vec2::new(x as f32, y as f32);
      let w = raster::barycentric(uv[0], uv[1], uv[2], p)?;

      let position = v[0].position * w.x + v[1].position * w.y + v[2].position * w.z;
      let normal = (v[0].normal * w.x + v[1].normal * w.y + v[2].normal * w.z)
        .normalize_or_zero();
      if !position.is_finite() || !normal.is_finite() {
        return Err(Error::NonFinite {
          stage: "texel attribute interpolation",
        });
      }

      let (color, extra) = eval.material(position, normal);
      let (x, y) = (x as u32, y as u32);
      albedo.set(x, y, &color);
      special.set(x, y, &extra);
      height_map.set(x, y, &[eval.height(position, normal)]);
      Ok(())
    })?;
  }

  for img in [&mut albedo, &mut special, &mut height_map] {
    img.flip_vertical();
    img.inpaint(INPAINT_PASSES);
  }
  debug!(width, height, "chunk textures synthesized");

  Ok(ChunkTextures {
    albedo,
    special,
    height: height_map,
  })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
