//! Decoding of uploaded images and PNG encoding.

pub mod png;

use anyhow::{Context, Result, ensure};
use gridprobe_derive::context;
use image::{DynamicImage, ImageFormat, load_from_memory_with_format};

/// Decodes an image, detecting the format from its magic bytes.
///
/// Supports PNG, JPEG, GIF, BMP, TIFF, WebP, ICO and PNM. TGA has no magic bytes and is tried
/// last when nothing else matches.
#[context("Failed to decode image ({} bytes)", bytes.len())]
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	ensure!(!bytes.is_empty(), "image is empty");
	if let Ok(format) = image::guess_format(bytes) {
		log::trace!("decoding {format:?} image");
		return Ok(load_from_memory_with_format(bytes, format)?);
	}
	load_from_memory_with_format(bytes, ImageFormat::Tga).context("unknown image format")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures;
	use image::GenericImageView;
	use rstest::rstest;

	#[rstest]
	#[case::png(ImageFormat::Png)]
	#[case::jpeg(ImageFormat::Jpeg)]
	#[case::gif(ImageFormat::Gif)]
	#[case::bmp(ImageFormat::Bmp)]
	#[case::tiff(ImageFormat::Tiff)]
	#[case::webp(ImageFormat::WebP)]
	fn decodes_common_formats(#[case] format: ImageFormat) {
		let bytes = fixtures::encoded(&fixtures::gradient_rgb(40, 30), format);
		let image = decode(&bytes).unwrap();
		assert_eq!(image.dimensions(), (40, 30));
	}

	#[test]
	fn rejects_garbage() {
		let err = decode(b"hello world, this is not an image").unwrap_err();
		assert!(format!("{err:#}").contains("unknown image format"), "{err:#}");
		assert!(decode(&[]).is_err());
	}

	#[test]
	fn rejects_truncated_png() {
		let mut bytes = fixtures::encoded(&fixtures::gradient_rgb(64, 64), ImageFormat::Png);
		bytes.truncate(bytes.len() / 2);
		assert!(decode(&bytes).is_err());
	}
}
