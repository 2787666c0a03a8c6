use gridprobe_derive::ConfigDoc;
use gridprobe_image::png;
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize, PartialEq, ConfigDoc)]
#[serde(deny_unknown_fields)]
pub struct ThumbnailConfig {
	/// Largest accepted `resolution` parameter. Larger values are rejected with 400.
	/// Defaults to 8192
	#[serde(default)]
	#[config_demo("8192")]
	pub max_resolution: Option<u32>,

	/// PNG encoder speed from 0 (smallest files) to 100 (fastest).
	/// Defaults to 10
	#[serde(default)]
	#[config_demo("10")]
	pub png_speed: Option<u8>,
}

impl ThumbnailConfig {
	pub const DEFAULT_MAX_RESOLUTION: u32 = 8192;

	pub fn max_resolution(&self) -> u32 {
		self.max_resolution.unwrap_or(Self::DEFAULT_MAX_RESOLUTION)
	}

	pub fn png_speed(&self) -> u8 {
		self.png_speed.unwrap_or(png::DEFAULT_SPEED).min(100)
	}
}
