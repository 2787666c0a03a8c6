use super::{CorsConfig, ServerConfig, ThumbnailConfig};
use anyhow::Result;
use gridprobe_derive::{ConfigDoc, context};
use serde::Deserialize;
use std::{
	collections::HashMap,
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq, ConfigDoc)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Cross-Origin Resource Sharing (CORS) settings
	#[serde(default)]
	pub cors: CorsConfig,

	/// Thumbnail rendering
	#[serde(default)]
	pub thumbnail: ThumbnailConfig,

	/// Extra response headers added to every HTTP response.
	#[serde(default)]
	#[config_demo(
		r#"
  Cache-Control: no-store
  X-Content-Type-Options: nosniff"#
	)]
	pub extra_response_headers: HashMap<String, String>,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		serde_yaml_ng::from_reader::<_, Config>(reader)?.checked()
	}

	pub fn from_string(text: &str) -> Result<Self> {
		serde_yaml_ng::from_str::<Config>(text)?.checked()
	}

	/// Rejects values that parse as YAML but cannot be used, such as a broken origin regex.
	fn checked(self) -> Result<Self> {
		self.cors.origin_patterns()?;
		Ok(self)
	}

	#[context("Failed to read config file {:?}", path)]
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		Config::from_reader(BufReader::new(file))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::{NamedTempFile, prelude::*};
	use pretty_assertions::assert_eq;

	fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect()
	}

	#[test]
	fn parse_full_config() {
		let yaml = r#"
server:
  ip: 0.0.0.0
  port: 8123
  max_upload_bytes: 1048576
  request_timeout_seconds: 5
  concurrency_limit: 4
cors:
  allowed_origins: ["https://example.org", "*.other-example.org"]
  max_age_seconds: 600
thumbnail:
  max_resolution: 1024
  png_speed: 90
extra_response_headers:
  Cache-Control: no-store
"#;
		assert_eq!(
			Config::from_string(yaml).unwrap(),
			Config {
				server: ServerConfig {
					ip: Some("0.0.0.0".to_string()),
					port: Some(8123),
					max_upload_bytes: Some(1_048_576),
					request_timeout_seconds: Some(5),
					concurrency_limit: Some(4),
				},
				cors: CorsConfig {
					allowed_origins: vec!["https://example.org".to_string(), "*.other-example.org".to_string()],
					max_age_seconds: Some(600),
				},
				thumbnail: ThumbnailConfig {
					max_resolution: Some(1024),
					png_speed: Some(90),
				},
				extra_response_headers: headers(&[("Cache-Control", "no-store")]),
			}
		);
	}

	#[test]
	fn parse_empty_config() {
		let config = Config::from_string("").unwrap();
		assert_eq!(config, Config::default());
		assert_eq!(config.cors.allowed_origins, vec!["*"]);
	}

	#[test]
	fn parse_invalid_config() {
		let err = Config::from_string("server:\n  pi: 3.14.15.9").unwrap_err();
		assert!(err.to_string().contains("unknown field `pi`"), "{err}");
		assert!(Config::from_string("cors:\n  max_age_seconds: soon").is_err());
	}

	#[test]
	fn broken_origin_regex_fails_at_load() {
		let err = Config::from_string("cors:\n  allowed_origins: [\"/^https://(a|b$/\"]\n").unwrap_err();
		assert!(err.to_string().contains("invalid CORS origin regex"), "{err}");

		let file = NamedTempFile::new("gridprobe.yml").unwrap();
		file.write_str("cors:\n  allowed_origins: [\"/[/\"]\n").unwrap();
		let err = Config::from_path(file.path()).unwrap_err();
		assert!(format!("{err:#}").contains("invalid CORS origin regex"), "{err:#}");
	}

	#[test]
	fn parse_demo_config() {
		let yaml = Config::demo_yaml();
		assert!(yaml.contains("# IP address to bind to."));
		let config = Config::from_string(&yaml).unwrap();
		assert_eq!(
			config,
			Config {
				server: ServerConfig {
					ip: Some("127.0.0.1".to_string()),
					port: Some(8000),
					max_upload_bytes: Some(67_108_864),
					request_timeout_seconds: Some(30),
					concurrency_limit: Some(64),
				},
				cors: CorsConfig {
					allowed_origins: vec!["https://example.org".to_string(), "*.example.net".to_string()],
					max_age_seconds: Some(86400),
				},
				thumbnail: ThumbnailConfig {
					max_resolution: Some(8192),
					png_speed: Some(10),
				},
				extra_response_headers: headers(&[("Cache-Control", "no-store"), ("X-Content-Type-Options", "nosniff")]),
			}
		);
	}

	#[test]
	fn from_path() {
		let file = NamedTempFile::new("gridprobe.yml").unwrap();
		file.write_str("server:\n  port: 8765\n").unwrap();
		assert_eq!(Config::from_path(file.path()).unwrap().server.port(), 8765);

		let err = Config::from_path(Path::new("/does/not/exist.yml")).unwrap_err();
		assert!(format!("{err:#}").contains("Failed to read config file"));
	}
}
