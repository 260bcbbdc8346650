//! UV atlas construction.
//!
//! One mesh in, one atlas out: triangles are grouped into near-planar
//! charts, each chart is projected onto its dominant plane, and the
//! charts are shelf-packed into a single rectangular atlas. Chart seams
//! duplicate vertices, so the atlas carries its own vertex list where
//! every entry cross-references (`xref`) the source mesh vertex it was
//! split from.

mod charts;
mod pack;

use glam::Vec2;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::error::{Error, Result};
use crate::mesh::{Mesh, Vertex};

/// Packing policy, lifted from the generation config.
pub struct PackOptions {
  pub texels_per_unit: f32,
  pub padding: u32,
  pub bilinear: bool,
  pub block_align: bool,
}

impl PackOptions {
  pub fn from_config(cfg: &ResolvedConfig) -> Self {
    Self {
      texels_per_unit: cfg.texels_per_unit,
      padding: cfg.padding,
      bilinear: cfg.bilinear,
      block_align: cfg.block_align,
    }
  }
}

/// One atlas vertex: a source vertex reference plus its texel position.
#[derive(Clone, Copy, Debug)]
pub struct AtlasVertex {
  /// Index of the source mesh vertex this entry was split from.
  pub xref: u32,
  /// Texel coordinates inside the atlas.
  pub uv: Vec2,
}

/// A packed single-region atlas for one mesh.
pub struct Atlas {
  pub width: u32,
  pub height: u32,
  pub vertices: Vec<AtlasVertex>,
  pub indices: Vec<u32>,
}

/// Chart, parameterize and pack `mesh` into one atlas.
pub fn build(mesh: &Mesh, opts: &PackOptions) -> Result<Atlas> {
  let charts = charts::compute_charts(mesh)?;
  let params = charts
    .iter()
    .map(|c| pack::parameterize(mesh, c, opts.texels_per_unit))
    .collect::<Result<Vec<_>>>()?;
  let (placements, width, height) = pack::pack(&params, opts);

  let mut vertices = Vec::new();
  let mut indices = Vec::new();
  for (chart, placement) in params.iter().zip(&placements) {
    let base = vertices.len() as u32;
    for (&xref, &uv) in chart.xrefs.iter().zip(&chart.uvs) {
      vertices.push(AtlasVertex {
        xref,
        uv: uv + placement.origin,
      });
    }
    indices.extend(chart.indices.iter().map(|&i| base + i));
  }

  let atlas = Atlas {
    width,
    height,
    vertices,
    indices,
  };
  atlas.validate(mesh)?;
  info!(
    width,
    height,
    charts = charts.len(),
    vertices = atlas.vertices.len(),
    "atlas packed"
  );
  Ok(atlas)
}

impl Atlas {
  /// One mesh instance, one atlas region, every reference in range.
  fn validate(&self, source: &Mesh) -> Result<()> {
    if self.indices.len() != source.indices.len() {
      return Err(Error::AtlasTopology(format!(
        "atlas holds {} indices for a mesh with {}",
        self.indices.len(),
        source.indices.len()
      )));
    }
    for v in &self.vertices {
      if v.xref as usize >= source.vertices.len() {
        return Err(Error::AtlasTopology(format!(
          "atlas vertex references missing source vertex {}",
          v.xref
        )));
      }
      let in_range = v.uv.x >= 0.0
        && v.uv.y >= 0.0
        && v.uv.x < (self.width - 1) as f32
        && v.uv.y < (self.height - 1) as f32;
      if !in_range {
        return Err(Error::AtlasTopology(format!(
          "texel {} outside the {}x{} atlas",
          v.uv, self.width, self.height
        )));
      }
    }
    Ok(())
  }

  /// Rebuild the mesh against the atlas layout: positions and normals
  /// come from each vertex's `xref`, UVs are normalized texel
  /// coordinates.
  pub fn apply(&self, source: &Mesh) -> Mesh {
    let denominator = Vec2::new((self.width - 1) as f32, (self.height - 1) as f32);
    let vertices = self
      .vertices
      .iter()
      .map(|v| {
        let src = source.vertices[v.xref as usize];
        Vertex {
          position: src.position,
          normal: src.normal,
          uv: v.uv / denominator,
        }
      })
      .collect();
    Mesh {
      vertices,
      indices: self.indices.clone(),
    }
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
