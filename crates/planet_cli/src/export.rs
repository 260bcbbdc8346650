//! File export sinks for generated meshes and textures.

use anyhow::{bail, Context, Result};
use glam::Vec2;
use image::{GrayImage, RgbImage};
use std::fmt::Write as _;
use std::path::Path;

use planet_gen::{ChannelImage, Mesh};

fn write_text(path: &Path, text: String) -> Result<()> {
	std::fs::write(path, text).with_context(|| format!("Failed to write: {}", path.display()))
}

fn textured_obj(mesh: &Mesh) -> Result<String> {
	let mut out = String::new();
	for v in &mesh.vertices {
		let p = v.position;
		writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
	}
	for v in &mesh.vertices {
		let n = v.normal;
		writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
	}
	for v in &mesh.vertices {
		writeln!(out, "vt {} {}", v.uv.x, v.uv.y)?;
	}
	for t in 0..mesh.triangle_count() {
		let i = [
			mesh.indices[t * 3] + 1,
			mesh.indices[t * 3 + 1] + 1,
			mesh.indices[t * 3 + 2] + 1,
		];
		writeln!(
			out,
			"f {}/{}/{} {}/{}/{} {}/{}/{}",
			i[0], i[0], i[0], i[1], i[1], i[1], i[2], i[2], i[2]
		)?;
	}
	Ok(out)
}

fn collider_obj(mesh: &Mesh) -> Result<String> {
	let mut out = String::new();
	for v in &mesh.vertices {
		let p = v.position;
		writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
	}
	for t in 0..mesh.triangle_count() {
		writeln!(
			out,
			"f {} {} {}",
			mesh.indices[t * 3] + 1,
			mesh.indices[t * 3 + 1] + 1,
			mesh.indices[t * 3 + 2] + 1
		)?;
	}
	Ok(out)
}

/// Write a render mesh as Wavefront OBJ with normals and atlas UVs.
pub fn write_obj(path: &Path, mesh: &Mesh) -> Result<()> {
	write_text(path, textured_obj(mesh)?)
}

/// Write a physics mesh as a position-only OBJ. Colliders carry no
/// normals or UVs, so the faces reference vertices alone.
pub fn write_collider_obj(path: &Path, mesh: &Mesh) -> Result<()> {
	write_text(path, collider_obj(mesh)?)
}

/// Write a float channel image as an 8-bit PNG. 1 channel maps to
/// grayscale, 2 and 3 channels to RGB (missing channels zero-filled).
pub fn write_channel_png(path: &Path, img: &ChannelImage) -> Result<()> {
	let (w, h) = (img.width(), img.height());
	let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
	match img.channels() {
		1 => {
			let mut png = GrayImage::new(w, h);
			for (x, y, pixel) in png.enumerate_pixels_mut() {
				pixel.0 = [quantize(img.get(x, y)[0])];
			}
			png.save(path)
		}
		2 | 3 => {
			let mut png = RgbImage::new(w, h);
			for (x, y, pixel) in png.enumerate_pixels_mut() {
				let texel = img.get(x, y);
				for (c, value) in pixel.0.iter_mut().enumerate() {
					*value = quantize(texel.get(c).copied().unwrap_or(0.0));
				}
			}
			png.save(path)
		}
		other => bail!("Unsupported channel count: {other}"),
	}
	.with_context(|| format!("Failed to write: {}", path.display()))
}

fn navigation_obj(mesh: &Mesh, tiles: &[Vec2]) -> Result<String> {
	if tiles.len() != mesh.vertices.len() {
		bail!(
			"Tile count {} does not match vertex count {}",
			tiles.len(),
			mesh.vertices.len()
		);
	}
	let mut out = String::new();
	for v in &mesh.vertices {
		let p = v.position;
		writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
	}
	for v in &mesh.vertices {
		let n = v.normal;
		writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
	}
	for tile in tiles {
		writeln!(out, "vt {} {}", tile.x, tile.y)?;
	}
	for t in 0..mesh.triangle_count() {
		let i = [
			mesh.indices[t * 3] + 1,
			mesh.indices[t * 3 + 1] + 1,
			mesh.indices[t * 3 + 2] + 1,
		];
		writeln!(
			out,
			"f {}/{}/{} {}/{}/{} {}/{}/{}",
			i[0], i[0], i[0], i[1], i[1], i[1], i[2], i[2], i[2]
		)?;
	}
	Ok(out)
}

/// Write the navigation mesh as OBJ with its per-vertex path
/// properties in the texture-coordinate channel (u = difficulty,
/// v = normalized terrain type).
pub fn write_navigation_obj(path: &Path, mesh: &Mesh, tiles: &[Vec2]) -> Result<()> {
	write_text(path, navigation_obj(mesh, tiles)?)
}

/// Write the middle density slice as a grayscale PNG, normalized over
/// the slice's value range.
pub fn write_density_slice(path: &Path, n: usize, values: &[f32]) -> Result<()> {
	let min = values.iter().copied().fold(f32::INFINITY, f32::min);
	let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let range = (max - min).max(1e-12);
	let mut png = GrayImage::new(n as u32, n as u32);
	for (x, y, pixel) in png.enumerate_pixels_mut() {
		let v = values[y as usize * n + x as usize];
		pixel.0 = [(((v - min) / range) * 255.0).round() as u8];
	}
	png.save(path)
		.with_context(|| format!("Failed to write: {}", path.display()))
}
