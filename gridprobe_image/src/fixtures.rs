//! Synthetic images for tests.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Horizontal red ramp, vertical green ramp, constant blue.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
		image::Rgb([ramp(x, width), ramp(y, height), 96])
	}))
}

/// Like [`gradient_rgb`] with alpha fading out to the right.
pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageRgba8(image::RgbaImage::from_fn(width, height, |x, y| {
		image::Rgba([ramp(x, width), ramp(y, height), 96, 255 - ramp(x, width)])
	}))
}

pub fn gradient_grey(width: u32, height: u32) -> DynamicImage {
	DynamicImage::ImageLuma8(image::GrayImage::from_fn(width, height, |x, _| image::Luma([ramp(x, width)])))
}

/// Encodes `image` in `format`, converting to a layout the encoder accepts first.
pub fn encoded(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
	let image = match format {
		ImageFormat::Jpeg | ImageFormat::Pnm => DynamicImage::ImageRgb8(image.to_rgb8()),
		ImageFormat::Gif | ImageFormat::Ico | ImageFormat::WebP => DynamicImage::ImageRgba8(image.to_rgba8()),
		_ => image.clone(),
	};
	let mut cursor = Cursor::new(Vec::new());
	image.write_to(&mut cursor, format).unwrap();
	cursor.into_inner()
}

fn ramp(value: u32, size: u32) -> u8 {
	(value * 255 / size.saturating_sub(1).max(1)) as u8
}
