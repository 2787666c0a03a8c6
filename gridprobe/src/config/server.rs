use gridprobe_derive::ConfigDoc;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Default, Clone, Deserialize, PartialEq, ConfigDoc)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP address to bind to.
	/// Defaults to 127.0.0.1
	#[serde(default)]
	#[config_demo("127.0.0.1")]
	pub ip: Option<String>,

	/// TCP port to bind to.
	/// Defaults to 8000
	#[serde(default)]
	#[config_demo("8000")]
	pub port: Option<u16>,

	/// Largest accepted upload in bytes.
	/// Defaults to 67108864 (64 MiB)
	#[serde(default)]
	#[config_demo("67108864")]
	pub max_upload_bytes: Option<usize>,

	/// Hard limit for the wall time of a single request, in seconds.
	/// Defaults to 30
	#[serde(default)]
	#[config_demo("30")]
	pub request_timeout_seconds: Option<u64>,

	/// Number of requests processed at the same time. Further requests queue up,
	/// and are answered with 503 once the queue is full.
	/// Defaults to 64
	#[serde(default)]
	#[config_demo("64")]
	pub concurrency_limit: Option<usize>,
}

impl ServerConfig {
	pub const DEFAULT_IP: &str = "127.0.0.1";
	pub const DEFAULT_PORT: u16 = 8000;
	pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;
	pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
	pub const DEFAULT_CONCURRENCY_LIMIT: usize = 64;

	pub fn ip(&self) -> &str {
		self.ip.as_deref().unwrap_or(Self::DEFAULT_IP)
	}

	pub fn port(&self) -> u16 {
		self.port.unwrap_or(Self::DEFAULT_PORT)
	}

	pub fn max_upload_bytes(&self) -> usize {
		self.max_upload_bytes.unwrap_or(Self::DEFAULT_MAX_UPLOAD_BYTES)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(
			self
				.request_timeout_seconds
				.unwrap_or(Self::DEFAULT_REQUEST_TIMEOUT_SECONDS),
		)
	}

	pub fn concurrency_limit(&self) -> usize {
		self.concurrency_limit.unwrap_or(Self::DEFAULT_CONCURRENCY_LIMIT).max(1)
	}

	pub fn override_optional_ip(&mut self, ip: Option<&str>) {
		if let Some(ip) = ip {
			self.ip = Some(ip.to_string());
		}
	}

	pub fn override_optional_port(&mut self, port: Option<u16>) {
		if port.is_some() {
			self.port = port;
		}
	}

	pub fn override_optional_max_upload_bytes(&mut self, max_upload_bytes: Option<usize>) {
		if max_upload_bytes.is_some() {
			self.max_upload_bytes = max_upload_bytes;
		}
	}
}
