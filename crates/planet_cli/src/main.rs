//! Planet surface generator front end.
//!
//! Loads a generation config from TOML, runs the pipeline and exports
//! the results as OBJ meshes and PNG textures:
//! - planet-chunk-<i>.obj plus planet-{albedo,special,height}-<i>.png
//!   per render chunk
//! - planet-navigation.obj (path properties in the vt channel)
//! - planet-collider.obj
//! - density_slice.png when debug dumps are enabled

mod export;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use planet_gen::{pipeline, ClusterDecimator, GenConfig};

/// Procedural planet surface generator.
#[derive(Parser, Debug)]
#[command(name = "planet_gen")]
#[command(about = "Generates a textured planet surface from a density field")]
struct Args {
	/// Path to configuration TOML file (defaults apply when omitted).
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Output directory for meshes and textures.
	#[arg(short, long, default_value = "planet_out")]
	output: PathBuf,

	/// Override the configured noise seed.
	#[arg(long)]
	seed: Option<u64>,

	/// Override the configured shape mode (name or "random").
	#[arg(long)]
	shape: Option<String>,

	/// Override the configured elevation mode.
	#[arg(long)]
	elevation: Option<String>,
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();

	let mut config = match &args.config {
		Some(path) => {
			let raw = std::fs::read_to_string(path)
				.with_context(|| format!("Failed to read config: {}", path.display()))?;
			toml::from_str::<GenConfig>(&raw)
				.with_context(|| format!("Failed to parse config: {}", path.display()))?
		}
		None => GenConfig::default(),
	};
	if let Some(seed) = args.seed {
		config.seed = seed;
	}
	if let Some(shape) = args.shape {
		config.shape_mode = shape;
	}
	if let Some(elevation) = args.elevation {
		config.elevation_mode = elevation;
	}

	let resolved = config.resolve().context("Invalid generation config")?;
	println!(
		"Generating planet: shape={}, elevation={}, seed={}",
		resolved.shape_name(),
		resolved.elevation_name(),
		resolved.seed
	);

	let output = pipeline::generate(&resolved, &ClusterDecimator).context("Generation failed")?;

	std::fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create output dir: {}", args.output.display()))?;

	for (i, chunk) in output.render_chunks.iter().enumerate() {
		export::write_obj(&args.output.join(format!("planet-chunk-{i}.obj")), &chunk.mesh)?;
		export::write_channel_png(
			&args.output.join(format!("planet-albedo-{i}.png")),
			&chunk.textures.albedo,
		)?;
		export::write_channel_png(
			&args.output.join(format!("planet-special-{i}.png")),
			&chunk.textures.special,
		)?;
		export::write_channel_png(
			&args.output.join(format!("planet-height-{i}.png")),
			&chunk.textures.height,
		)?;
	}
	println!("  ✓ {} render chunks", output.chunk_count);

	export::write_navigation_obj(
		&args.output.join("planet-navigation.obj"),
		&output.navigation.mesh,
		&output.navigation.tiles,
	)?;
	println!(
		"  ✓ navigation mesh ({} triangles)",
		output.navigation.mesh.triangle_count()
	);

	export::write_collider_obj(&args.output.join("planet-collider.obj"), &output.collider)?;
	println!(
		"  ✓ collider mesh ({} triangles)",
		output.collider.triangle_count()
	);

	// Debug artifacts are auxiliary; a failed dump never fails the run.
	if let Some((n, slice)) = &output.debug_density_slice {
		let path = args.output.join("density_slice.png");
		match export::write_density_slice(&path, *n, slice) {
			Ok(()) => println!("  ✓ density slice"),
			Err(err) => warn!("Density slice dump failed: {err:#}"),
		}
	}

	println!(
		"Done: scale={:.5}, output written to {}",
		output.scale,
		args.output.display()
	);
	Ok(())
}
