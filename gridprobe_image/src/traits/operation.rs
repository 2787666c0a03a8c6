//! Image manipulation used by the thumbnail pipeline.

use crate::Resolution;
use anyhow::Result;
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use gridprobe_derive::context;
use image::DynamicImage;

pub trait DynamicImageTraitOperation {
	/// Stretches the image to exactly `resolution x resolution` pixels.
	///
	/// The aspect ratio is not preserved. Uses Catmull-Rom convolution and keeps the pixel type.
	fn resize_square(&self, resolution: Resolution) -> Result<DynamicImage>;

	/// Converts to 8-bit RGB.
	///
	/// Alpha is dropped without compositing, wider samples are scaled down to 8 bits and grey is
	/// replicated into all three channels.
	fn into_rgb(self) -> DynamicImage;
}

impl DynamicImageTraitOperation for DynamicImage {
	#[context("resizing {}x{} ({:?}) to {}x{}", self.width(), self.height(), self.color(), resolution, resolution)]
	fn resize_square(&self, resolution: Resolution) -> Result<DynamicImage> {
		let size = resolution.get();
		let mut dst_image = DynamicImage::new(size, size, self.color());
		Resizer::new().resize(
			self,
			&mut dst_image,
			&ResizeOptions::default().resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom)),
		)?;
		Ok(dst_image)
	}

	fn into_rgb(self) -> DynamicImage {
		match self {
			DynamicImage::ImageRgb8(_) => self,
			other => DynamicImage::ImageRgb8(other.into_rgb8()),
		}
	}
}
