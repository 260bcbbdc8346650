//! planet_gen - Procedural planet surface generation
//!
//! This crate turns a signed-distance/noise density field into a fully
//! textured planet surface. The pipeline runs in fixed stages:
//!
//! 1. **Field evaluation** - shape + elevation SDFs sampled over [-1,1]³
//! 2. **Isosurface extraction** - dual contouring of the density grid into
//!    a quad mesh, triangulated along shorter diagonals
//! 3. **Mesh processing** - scale normalization, per-profile simplification
//!    (render/navigation/collider) and spatial chunk splitting
//! 4. **Atlas building** - chart decomposition, planar parameterization and
//!    shelf packing into a single UV atlas per chunk
//! 5. **Texture synthesis** - scanline rasterization of UV triangles with
//!    barycentric recovery of position/normal, material evaluation and
//!    inpainting of unfilled texels
//!
//! Stages 3-5 run on worker threads coordinated by two join barriers; see
//! [`pipeline::generate`] for the orchestration contract.
//!
//! # Example
//!
//! ```ignore
//! use planet_gen::{pipeline, ClusterDecimator, GenConfig};
//!
//! let cfg = GenConfig::default().resolve()?;
//! let output = pipeline::generate(&cfg, &ClusterDecimator)?;
//! println!("{} render chunks", output.render_chunks.len());
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod extract;
pub mod field;
pub mod grid;
pub mod mesh;
pub mod partition;
pub mod pipeline;
pub mod process;
pub mod texture;

pub use config::{GenConfig, ResolvedConfig};
pub use error::{Error, Result};
pub use field::{ElevationMode, ShapeMode, TerrainField};
pub use grid::DensityGrid;
pub use mesh::{Mesh, Vertex};
pub use process::{ClusterDecimator, Decimator, SimplifyProfile};
pub use texture::{ChannelImage, MaterialEval, TerrainMaterial};
