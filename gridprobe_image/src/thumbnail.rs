//! Thumbnail rendering: optional square resize, RGB conversion, PNG encoding.

use crate::{DynamicImageTraitOperation, png};
use anyhow::{Context, Result, bail, ensure};
use image::DynamicImage;
use std::{fmt, num::NonZeroU32};

/// Edge length of a square thumbnail, always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution(NonZeroU32);

impl Resolution {
	pub fn new(value: u32) -> Result<Resolution> {
		NonZeroU32::new(value)
			.map(Resolution)
			.context("resolution must be a positive integer")
	}

	/// Parses a decimal integer, rejecting zero, negative and non-integer input.
	pub fn parse(text: &str) -> Result<Resolution> {
		let text = text.trim();
		let value: i64 = text
			.parse()
			.with_context(|| format!("resolution must be a positive integer, got '{text}'"))?;
		Resolution::try_from(value)
	}

	/// Fails when the resolution exceeds `max`.
	pub fn at_most(self, max: u32) -> Result<Resolution> {
		ensure!(self.get() <= max, "resolution {self} exceeds the maximum of {max}");
		Ok(self)
	}

	pub fn get(self) -> u32 {
		self.0.get()
	}
}

impl TryFrom<i64> for Resolution {
	type Error = anyhow::Error;

	fn try_from(value: i64) -> Result<Resolution> {
		if value <= 0 {
			bail!("resolution must be a positive integer, got {value}");
		}
		let value = u32::try_from(value).with_context(|| format!("resolution {value} is too large"))?;
		Resolution::new(value)
	}
}

impl fmt::Display for Resolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Encoded PNG thumbnail with its dimensions.
#[derive(Clone, Debug)]
pub struct Thumbnail {
	pub png: Vec<u8>,
	pub width: u32,
	pub height: u32,
}

/// Renders `image` as an 8-bit RGB PNG.
///
/// With a resolution the image is stretched to a `resolution x resolution` square first;
/// without one it keeps its dimensions.
pub fn render_thumbnail(image: DynamicImage, resolution: Option<Resolution>, png_speed: u8) -> Result<Thumbnail> {
	let image = match resolution {
		Some(resolution) => image.resize_square(resolution)?,
		None => image,
	};
	let image = image.into_rgb();
	let png = png::encode(&image, png_speed)?;
	Ok(Thumbnail {
		png,
		width: image.width(),
		height: image.height(),
	})
}
