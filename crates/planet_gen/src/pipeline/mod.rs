//! Pipeline orchestration.
//!
//! `generate` runs the sequential front of the pipeline (field sampling,
//! extraction, scale normalization) on the calling thread, then two
//! parallel phases separated by join barriers:
//!
//! - Phase 1: navigation and collider derivation, each on its own
//!   thread with its own copy of the base mesh.
//! - Phase 2: render derivation (simplify, split, per-chunk texturing on
//!   an inner worker pool) concurrently with tile generation over the
//!   Phase 1 navigation mesh.
//!
//! Mesh copies are taken at fork points so no mutable mesh state is ever
//! shared across threads. The only cross-thread shared state is an
//! atomic chunk counter, read for progress reporting alone. Any error or
//! panic inside a worker terminates the whole run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use glam::Vec2;
use tracing::{info, info_span};

use crate::atlas;
use crate::config::ResolvedConfig;
use crate::error::{Error, Result};
use crate::extract;
use crate::field::TerrainField;
use crate::grid::DensityGrid;
use crate::mesh::Mesh;
use crate::partition::partition_ranges;
use crate::process::{self, Decimator, SimplifyProfile};
use crate::texture::{self, ChunkTextures, MaterialEval, TerrainMaterial, PATH_TYPE_COUNT};

/// One textured render chunk.
pub struct RenderChunk {
  /// Atlas-mapped chunk geometry, UVs normalized to [0,1).
  pub mesh: Mesh,
  pub atlas_width: u32,
  pub atlas_height: u32,
  pub textures: ChunkTextures,
}

/// Navigation mesh plus its per-vertex path properties.
pub struct NavigationOutput {
  pub mesh: Mesh,
  /// Per vertex: (difficulty, normalized terrain type).
  pub tiles: Vec<Vec2>,
}

/// Everything one generation run produces.
pub struct PlanetOutput {
  /// Shape registry name, pinned even for "random" selection.
  pub shape: &'static str,
  pub elevation: &'static str,
  /// Scale factor applied during normalization.
  pub scale: f32,
  pub render_chunks: Vec<RenderChunk>,
  pub navigation: NavigationOutput,
  pub collider: Mesh,
  pub chunk_count: usize,
  /// Middle z-slice of the density grid, (resolution, values).
  pub debug_density_slice: Option<(usize, Vec<f32>)>,
}

fn unwind<T>(joined: thread::Result<T>) -> T {
  match joined {
    Ok(value) => value,
    Err(panic) => std::panic::resume_unwind(panic),
  }
}

/// Run the full generation pipeline.
pub fn generate<D>(cfg: &ResolvedConfig, decimator: &D) -> Result<PlanetOutput>
where
  D: Decimator + Sync,
{
  let span = info_span!("generate", shape = cfg.shape_name(), elevation = cfg.elevation_name());
  let _guard = span.enter();

  let field = TerrainField::new(cfg);
  let n = cfg.resolution;
  let grid = DensityGrid::sample(n, |p| field.sdf_land(p))?;
  let debug_density_slice = cfg.debug_dump.then(|| (n, grid.middle_slice()));

  let quads = extract::extract(&grid, 0.0);
  drop(grid);
  let mut base = extract::triangulate(&quads, n)?;
  let scale = process::normalize_scale(&mut base);

  // Phase 1: navigation and collider forks, joined before phase 2 so
  // tile generation can consume the finished navigation mesh.
  let (nav_joined, collider_joined) = thread::scope(|s| {
    let nav = s.spawn(|| {
      let own = base.clone();
      decimator.simplify(&own, SimplifyProfile::Navigation, cfg.navigation_triangle_budget)
    });
    let collider = s.spawn(|| {
      let own = base.clone();
      decimator.simplify(&own, SimplifyProfile::Collider, cfg.collider_triangle_budget)
    });
    (nav.join(), collider.join())
  });
  let navigation_mesh = unwind(nav_joined)?;
  let collider = unwind(collider_joined)?;
  info!(
    navigation_triangles = navigation_mesh.triangle_count(),
    collider_triangles = collider.triangle_count(),
    "phase 1 joined"
  );

  // Phase 2: render derivation and tile generation run concurrently.
  let eval = TerrainMaterial::new(cfg.seed);
  let (render_joined, tiles_joined) = thread::scope(|s| {
    let render = s.spawn(|| -> Result<Vec<RenderChunk>> {
      let own = base.clone();
      let simplified =
        decimator.simplify(&own, SimplifyProfile::Render, cfg.render_triangle_budget)?;
      let chunks = process::split_chunks(&simplified, cfg.chunk_triangle_budget);
      texture_chunks(&chunks, cfg, &eval)
    });
    let tiles = s.spawn(|| navigation_tiles(&navigation_mesh, &eval));
    (render.join(), tiles.join())
  });
  let render_chunks = unwind(render_joined)?;
  let tiles = unwind(tiles_joined);
  info!(chunks = render_chunks.len(), "phase 2 joined");

  Ok(PlanetOutput {
    shape: cfg.shape_name(),
    elevation: cfg.elevation_name(),
    scale,
    chunk_count: render_chunks.len(),
    render_chunks,
    navigation: NavigationOutput {
      mesh: navigation_mesh,
      tiles,
    },
    collider,
    debug_density_slice,
  })
}

/// Texture every chunk on a static worker pool. Chunks are partitioned
/// contiguously across workers; each worker writes only its own output
/// slots, so the shared counter exists purely for progress logs.
fn texture_chunks(
  chunks: &[Mesh],
  cfg: &ResolvedConfig,
  eval: &TerrainMaterial,
) -> Result<Vec<RenderChunk>> {
  let opts = atlas::PackOptions::from_config(cfg);
  let workers = thread::available_parallelism().map_or(4, |n| n.get());
  let ranges = partition_ranges(chunks.len(), workers);

  let mut slots: Vec<Option<Result<RenderChunk>>> = Vec::new();
  slots.resize_with(chunks.len(), || None);
  let progress = AtomicUsize::new(0);

  thread::scope(|s| {
    let opts = &opts;
    let progress = &progress;
    let total = chunks.len();
    let upscale = cfg.texture_upscale;
    let mut remaining = slots.as_mut_slice();
    let mut handles = Vec::with_capacity(ranges.len());
    for range in &ranges {
      let (out, rest) = remaining.split_at_mut(range.len());
      remaining = rest;
      let slice = &chunks[range.clone()];
      handles.push(s.spawn(move || {
        for (slot, chunk) in out.iter_mut().zip(slice) {
          *slot = Some(texture_chunk(chunk, opts, upscale, eval));
          let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
          info!(done, total, "chunk textured");
        }
      }));
    }
    for handle in handles {
      unwind(handle.join());
    }
  });

  let mut out = Vec::with_capacity(slots.len());
  for slot in slots {
    let produced = slot.ok_or_else(|| {
      Error::AtlasTopology("a worker left its chunk range unprocessed".into())
    })?;
    out.push(produced?);
  }
  Ok(out)
}

fn texture_chunk(
  chunk: &Mesh,
  opts: &atlas::PackOptions,
  upscale: u32,
  eval: &TerrainMaterial,
) -> Result<RenderChunk> {
  let atlas = atlas::build(chunk, opts)?;
  let mesh = atlas.apply(chunk);
  let textures = texture::synthesize(&mesh, atlas.width, atlas.height, upscale, eval)?;
  Ok(RenderChunk {
    mesh,
    atlas_width: atlas.width,
    atlas_height: atlas.height,
    textures,
  })
}

/// Per-vertex path properties for the navigation mesh: x is traversal
/// difficulty, y the terrain type id normalized to the open unit
/// interval.
fn navigation_tiles(mesh: &Mesh, eval: &TerrainMaterial) -> Vec<Vec2> {
  mesh
    .vertices
    .iter()
    .map(|v| {
      let (kind, difficulty) = eval.path_property(v.position, v.normal);
      Vec2::new(difficulty, (kind as f32 + 0.5) / PATH_TYPE_COUNT as f32)
    })
    .collect()
}
