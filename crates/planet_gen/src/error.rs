//! Error taxonomy for the generation pipeline.
//!
//! Every fatal category unwinds to the orchestrator and terminates the run.
//! Nothing is retried: the inputs are deterministic, so a retry would
//! reproduce the same failure.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// Shape mode name not present in the registry. Reported before any
  /// sampling begins.
  #[error("unknown shape mode '{0}'")]
  UnknownShapeMode(String),

  /// Elevation mode name not present in the registry.
  #[error("unknown elevation mode '{0}'")]
  UnknownElevationMode(String),

  /// A NaN or infinity escaped a numeric stage. Indicates a broken field
  /// or degenerate geometry; never clamped silently.
  #[error("non-finite value in {stage}")]
  NonFinite { stage: &'static str },

  /// Isosurface extraction produced zero vertices or indices, meaning the
  /// density field never crosses the isovalue in the sampled volume.
  #[error("isosurface extraction produced an empty mesh")]
  EmptyMesh,

  /// Atlas packing violated the one-mesh/one-atlas postcondition.
  #[error("atlas topology violation: {0}")]
  AtlasTopology(String),

  /// External decimation collaborator failed. Propagated, not retried; a
  /// partial mesh is not a valid output.
  #[error("mesh decimation failed: {0}")]
  Decimation(String),
}
