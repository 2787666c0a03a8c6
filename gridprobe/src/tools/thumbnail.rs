use anyhow::{Context, Result};
use gridprobe::image::{Resolution, decode, png, render_thumbnail};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Image to read: PNG, JPEG, GIF, BMP, TIFF, WebP, ICO, TGA or PNM
	#[arg(required = true)]
	pub input: PathBuf,

	/// PNG file to write
	#[arg(required = true)]
	pub output: PathBuf,

	/// Stretch the image to a square of this edge length.
	/// Without it the thumbnail keeps the input dimensions.
	#[arg(short, long, allow_hyphen_values = true, verbatim_doc_comment)]
	pub resolution: Option<String>,

	/// PNG encoder speed from 0 (smallest file) to 100 (fastest)
	#[arg(long, default_value_t = png::DEFAULT_SPEED)]
	pub speed: u8,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let resolution = arguments.resolution.as_deref().map(Resolution::parse).transpose()?;

	let bytes = std::fs::read(&arguments.input).with_context(|| format!("Failed to read {:?}", arguments.input))?;
	let thumbnail = render_thumbnail(decode(&bytes)?, resolution, arguments.speed)?;

	std::fs::write(&arguments.output, &thumbnail.png)
		.with_context(|| format!("Failed to write {:?}", arguments.output))?;
	log::info!(
		"wrote {}x{} thumbnail ({} bytes) to {:?}",
		thumbnail.width,
		thumbnail.height,
		thumbnail.png.len(),
		arguments.output
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use gridprobe_image::fixtures::{encoded, gradient_rgba};
	use image::{ColorType, GenericImageView, ImageFormat};
	use rstest::rstest;
	use tempfile::TempDir;

	fn render(format: ImageFormat, extra: &[&str]) -> anyhow::Result<image::DynamicImage> {
		let dir = TempDir::new()?;
		let input = dir.path().join("input");
		let output = dir.path().join("output.png");
		std::fs::write(&input, encoded(&gradient_rgba(30, 20), format))?;

		let mut args = vec!["gridprobe", "thumbnail", input.to_str().unwrap(), output.to_str().unwrap()];
		args.extend_from_slice(extra);
		run_command(args)?;

		Ok(image::open(&output)?)
	}

	#[rstest]
	#[case::png(ImageFormat::Png)]
	#[case::jpeg(ImageFormat::Jpeg)]
	#[case::gif(ImageFormat::Gif)]
	#[case::bmp(ImageFormat::Bmp)]
	fn keeps_dimensions(#[case] format: ImageFormat) {
		let image = render(format, &[]).unwrap();
		assert_eq!(image.dimensions(), (30, 20));
		assert_eq!(image.color(), ColorType::Rgb8);
	}

	#[test]
	fn square_resolution() {
		let image = render(ImageFormat::Png, &["-r", "48", "--speed", "0"]).unwrap();
		assert_eq!(image.dimensions(), (48, 48));
	}

	#[rstest]
	#[case::zero("0")]
	#[case::negative("-5")]
	#[case::text("big")]
	fn invalid_resolution(#[case] value: &str) {
		let err = render(ImageFormat::Png, &["-r", value]).unwrap_err();
		assert!(err.to_string().contains("resolution"), "{err}");
	}

	#[test]
	fn missing_input() {
		let err = run_command(vec!["gridprobe", "thumbnail", "/does/not/exist.png", "/tmp/never.png"]).unwrap_err();
		assert!(err.to_string().contains("Failed to read"), "{err}");
	}
}
