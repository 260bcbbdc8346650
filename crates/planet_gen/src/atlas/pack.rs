//! Chart parameterization and shelf packing.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::error::{Error, Result};
use crate::mesh::Mesh;

use super::charts::Chart;
use super::PackOptions;

/// Placement grid when charts are block aligned.
const BLOCK: u32 = 4;

/// A chart projected to 2D, in texel units, origin at (0,0).
pub struct ParamChart {
  /// Source mesh vertex ids, one per chart-local vertex. Seam vertices
  /// shared with other charts are duplicated per chart.
  pub xrefs: Vec<u32>,
  /// Chart-local texel coordinates, aligned with `xrefs`.
  pub uvs: Vec<Vec2>,
  /// Chart-local triangle indices.
  pub indices: Vec<u32>,
  /// Texel extent of the chart content.
  pub size: Vec2,
}

/// Project a chart's triangles onto its dominant plane and scale to
/// texels.
pub fn parameterize(mesh: &Mesh, chart: &Chart, texels_per_unit: f32) -> Result<ParamChart> {
  // Orthonormal basis of the chart plane.
  let normal = if chart.normal.length_squared() > 0.0 {
    chart.normal
  } else {
    Vec3::Z
  };
  let (tangent, bitangent) = normal.any_orthonormal_pair();

  let mut xrefs = Vec::new();
  let mut uvs: Vec<Vec2> = Vec::new();
  let mut indices = Vec::with_capacity(chart.triangles.len() * 3);
  let mut local = std::collections::HashMap::new();
  for &t in &chart.triangles {
    for e in 0..3 {
      let source = mesh.indices[t as usize * 3 + e];
      let id = *local.entry(source).or_insert_with(|| {
        let p = mesh.vertices[source as usize].position;
        xrefs.push(source);
        uvs.push(Vec2::new(p.dot(tangent), p.dot(bitangent)) * texels_per_unit);
        (xrefs.len() - 1) as u32
      });
      indices.push(id);
    }
  }

  let mut min = Vec2::splat(f32::INFINITY);
  let mut max = Vec2::splat(f32::NEG_INFINITY);
  for uv in &uvs {
    if !uv.is_finite() {
      return Err(Error::NonFinite {
        stage: "chart parameterization",
      });
    }
    min = min.min(*uv);
    max = max.max(*uv);
  }
  for uv in &mut uvs {
    *uv -= min;
  }

  Ok(ParamChart {
    xrefs,
    uvs,
    indices,
    size: max - min,
  })
}

/// A chart's placement in the atlas.
pub struct Placement {
  pub origin: Vec2,
}

/// Shelf-pack the charts; returns per-chart placements plus the final
/// atlas dimensions.
pub fn pack(charts: &[ParamChart], opts: &PackOptions) -> (Vec<Placement>, u32, u32) {
  let pad = opts.padding + u32::from(opts.bilinear);
  let align = |v: u32| -> u32 {
    if opts.block_align {
      v.div_ceil(BLOCK) * BLOCK
    } else {
      v
    }
  };

  // Sort tallest first so shelves stay dense; placement order must not
  // change the chart list order seen by callers.
  let mut order: Vec<usize> = (0..charts.len()).collect();
  order.sort_by(|&a, &b| {
    charts[b].size.y.total_cmp(&charts[a].size.y).then(b.cmp(&a))
  });

  let total_area: f32 = charts
    .iter()
    .map(|c| (c.size.x + pad as f32) * (c.size.y + pad as f32))
    .sum();
  let target_width = (total_area.sqrt().ceil() as u32).max(1).next_power_of_two();

  let mut placements: Vec<Placement> = Vec::with_capacity(charts.len());
  placements.resize_with(charts.len(), || Placement { origin: Vec2::ZERO });

  let mut cursor_x = pad;
  let mut shelf_y = align(pad);
  let mut shelf_height = 0u32;
  let mut used_width = 0u32;
  for &id in &order {
    let w = (charts[id].size.x.ceil() as u32) + 1;
    let h = (charts[id].size.y.ceil() as u32) + 1;
    if cursor_x + w + pad > target_width && cursor_x > pad {
      shelf_y = align(shelf_y + shelf_height + pad);
      cursor_x = pad;
      shelf_height = 0;
    }
    let x = align(cursor_x);
    placements[id].origin = Vec2::new(x as f32, shelf_y as f32);
    cursor_x = x + w + pad;
    shelf_height = shelf_height.max(h);
    used_width = used_width.max(cursor_x);
  }

  let width = used_width.max(target_width).max(BLOCK) + 1;
  let height = shelf_y + shelf_height + pad + 1;
  debug!(
    charts = charts.len(),
    width, height, "charts packed into atlas"
  );
  (placements, width, height)
}
