use crate::DynamicImageTraitInfo;
use anyhow::{Result, bail};
use image::{DynamicImage, ImageEncoder, codecs::png};

/// Default of the `speed` knob: small files at acceptable cost.
pub const DEFAULT_SPEED: u8 = 10;

/// Encodes an 8-bit grey, grey+alpha, RGB or RGBA image as PNG.
///
/// `speed` runs from `0` (smallest output) to `100` (fastest); values above `100` are clamped.
pub fn encode(image: &DynamicImage, speed: u8) -> Result<Vec<u8>> {
	if image.bits_per_value() != 8 {
		bail!("png encoding needs 8-bit samples, got {}", image.bits_per_value());
	}

	if !(1..=4).contains(&image.channel_count()) {
		bail!("png only supports Grey, GreyA, RGB or RGBA");
	}

	use png::{CompressionType, FilterType};
	let (compression_type, filter_type) = match speed.min(100) {
		0..20 => (CompressionType::Best, FilterType::Adaptive),
		20..40 => (CompressionType::Default, FilterType::Adaptive),
		40..60 => (CompressionType::Default, FilterType::Paeth),
		60..80 => (CompressionType::Default, FilterType::Avg),
		80..90 => (CompressionType::Fast, FilterType::Avg),
		_ => (CompressionType::Fast, FilterType::NoFilter),
	};

	let mut buffer: Vec<u8> = Vec::new();
	png::PngEncoder::new_with_quality(&mut buffer, compression_type, filter_type).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.extended_color_type(),
	)?;
	log::trace!(
		"encoded {}x{} PNG at speed {speed}: {} bytes",
		image.width(),
		image.height(),
		buffer.len()
	);

	Ok(buffer)
}
