//! Browser origins allowed to call the upload endpoints.
//!
//! Each entry of `allowed_origins` is compiled into an [`OriginPattern`] when the config is
//! loaded, so a malformed regular expression fails at startup instead of on the first request.
//!
//! ```yaml
//! cors:
//!   allowed_origins:
//!     - "https://viewer.example.org"
//!     - "/^https://(qa|dev)\\.example\\.org$/"
//!   max_age_seconds: 3600
//! ```
use anyhow::{Context, Result};
use gridprobe_derive::ConfigDoc;
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, ConfigDoc)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
	/// Origins whose browsers may post uploads. Defaults to `["*"]`.
	/// An entry is one of:
	/// - `*` for any origin
	/// - `*example.net` for origins ending with the rest
	/// - `https://dev-*` for origins starting with the rest
	/// - `/regex/` for origins matching a regular expression
	/// - a literal origin such as `https://viewer.example.org`
	#[serde(default = "default_allowed_origins")]
	#[config_demo(
		r#"
    - "https://example.org"
    - "*.example.net""#
	)]
	pub allowed_origins: Vec<String>,

	/// Seconds a browser may cache a preflight answer. Defaults to 86400.
	#[serde(default)]
	#[config_demo("86400")]
	pub max_age_seconds: Option<u64>,
}

impl CorsConfig {
	pub const DEFAULT_MAX_AGE_SECONDS: u64 = 86400;

	pub fn max_age_seconds(&self) -> u64 {
		self.max_age_seconds.unwrap_or(Self::DEFAULT_MAX_AGE_SECONDS)
	}

	/// Compiles `allowed_origins`, naming the first entry that is not a valid pattern.
	pub fn origin_patterns(&self) -> Result<Vec<OriginPattern>> {
		self.allowed_origins.iter().map(|p| OriginPattern::parse(p)).collect()
	}
}

impl Default for CorsConfig {
	fn default() -> Self {
		Self {
			allowed_origins: default_allowed_origins(),
			max_age_seconds: None,
		}
	}
}

fn default_allowed_origins() -> Vec<String> {
	vec!["*".to_string()]
}

/// One compiled entry of `cors.allowed_origins`.
#[derive(Debug, Clone)]
pub enum OriginPattern {
	Any,
	Suffix(String),
	Prefix(String),
	Regex(Regex),
	Exact(String),
}

impl OriginPattern {
	pub fn parse(pattern: &str) -> Result<OriginPattern> {
		if pattern == "*" {
			return Ok(OriginPattern::Any);
		}
		if let Some(expr) = pattern.strip_prefix('/').and_then(|p| p.strip_suffix('/'))
			&& !expr.is_empty()
		{
			let regex = Regex::new(expr).with_context(|| format!("invalid CORS origin regex '{pattern}'"))?;
			return Ok(OriginPattern::Regex(regex));
		}
		if let Some(suffix) = pattern.strip_prefix('*')
			&& !suffix.is_empty()
			&& !suffix.contains('*')
		{
			return Ok(OriginPattern::Suffix(suffix.to_string()));
		}
		if let Some(prefix) = pattern.strip_suffix('*')
			&& !prefix.is_empty()
			&& !prefix.contains('*')
		{
			return Ok(OriginPattern::Prefix(prefix.to_string()));
		}
		Ok(OriginPattern::Exact(pattern.to_string()))
	}

	pub fn matches(&self, origin: &str) -> bool {
		match self {
			OriginPattern::Any => true,
			OriginPattern::Suffix(suffix) => origin.ends_with(suffix.as_str()),
			OriginPattern::Prefix(prefix) => origin.starts_with(prefix.as_str()),
			OriginPattern::Regex(regex) => regex.is_match(origin),
			OriginPattern::Exact(exact) => origin == exact,
		}
	}
}
