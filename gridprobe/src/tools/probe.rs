use anyhow::{Context, Result};
use gridprobe::raster::read_attributes;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Raster file to inspect, e.g. a GeoTIFF
	#[arg(required = true)]
	pub filename: PathBuf,

	/// Pretty-print the JSON output
	#[arg(long)]
	pub pretty: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	log::info!("probe {:?}", arguments.filename);
	println!("{}", probe(arguments)?);
	Ok(())
}

fn probe(arguments: &Subcommand) -> Result<String> {
	let bytes = std::fs::read(&arguments.filename).with_context(|| format!("Failed to read {:?}", arguments.filename))?;
	let attributes = read_attributes(&bytes)?;
	Ok(if arguments.pretty {
		serde_json::to_string_pretty(&attributes)?
	} else {
		serde_json::to_string(&attributes)?
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::run_command;
	use assert_fs::{NamedTempFile, prelude::*};
	use gridprobe_image::fixtures::{encoded, gradient_rgb};
	use image::ImageFormat;

	fn tiff_file() -> NamedTempFile {
		let file = NamedTempFile::new("plain.tif").unwrap();
		file.write_binary(&encoded(&gradient_rgb(12, 7), ImageFormat::Tiff)).unwrap();
		file
	}

	#[test]
	fn plain_tiff() {
		let file = tiff_file();
		let json = probe(&Subcommand {
			filename: file.path().to_path_buf(),
			pretty: false,
		})
		.unwrap();
		assert_eq!(
			json,
			r#"{"width":12,"height":7,"bands":3,"crs":null,"bbox":[0.0,7.0,12.0,0.0],"driver":"GTiff","dtype":"uint8","transform":[1.0,0.0,0.0,0.0,1.0,0.0]}"#
		);
	}

	#[test]
	fn pretty_output() {
		let file = tiff_file();
		let json = probe(&Subcommand {
			filename: file.path().to_path_buf(),
			pretty: true,
		})
		.unwrap();
		assert!(json.contains("\n  \"width\": 12,"), "{json}");
	}

	#[test]
	fn via_command_line() {
		let file = tiff_file();
		run_command(vec!["gridprobe", "probe", "-q", file.path().to_str().unwrap()]).unwrap();
	}

	#[test]
	fn not_a_raster() {
		let file = NamedTempFile::new("notes.txt").unwrap();
		file.write_str("hello").unwrap();
		assert!(run_command(vec!["gridprobe", "probe", file.path().to_str().unwrap()]).is_err());
		assert!(run_command(vec!["gridprobe", "probe", "/does/not/exist.tif"]).is_err());
	}
}
