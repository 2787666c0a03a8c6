//! Coordinate reference system as a flat, ordered mapping of its defining parameters.
//!
//! EPSG-coded systems collapse to `{"init": "epsg:<code>"}`. Everything else keeps the
//! parameters it was described with, in the order they were read.

use serde::{Serialize, Serializer, ser::SerializeMap};
use std::fmt;

/// A single CRS parameter value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CrsValue {
	Text(String),
	Integer(i64),
	Float(f64),
	Flag(bool),
}

impl CrsValue {
	/// Interprets a textual parameter: integers first, then floats, otherwise text.
	pub fn parse(text: &str) -> CrsValue {
		if let Ok(v) = text.parse::<i64>() {
			CrsValue::Integer(v)
		} else if let Ok(v) = text.parse::<f64>() {
			CrsValue::Float(v)
		} else {
			CrsValue::Text(text.to_string())
		}
	}
}

impl From<&str> for CrsValue {
	fn from(value: &str) -> Self {
		CrsValue::Text(value.to_string())
	}
}

impl From<String> for CrsValue {
	fn from(value: String) -> Self {
		CrsValue::Text(value)
	}
}

impl From<i64> for CrsValue {
	fn from(value: i64) -> Self {
		CrsValue::Integer(value)
	}
}

impl From<f64> for CrsValue {
	fn from(value: f64) -> Self {
		CrsValue::Float(value)
	}
}

impl fmt::Display for CrsValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CrsValue::Text(v) => write!(f, "{v}"),
			CrsValue::Integer(v) => write!(f, "{v}"),
			CrsValue::Float(v) => write!(f, "{v}"),
			CrsValue::Flag(v) => write!(f, "{v}"),
		}
	}
}

/// Ordered CRS parameter mapping, serialized as a JSON object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Crs {
	entries: Vec<(String, CrsValue)>,
}

impl Crs {
	pub fn new() -> Crs {
		Crs::default()
	}

	pub fn from_epsg(code: u32) -> Crs {
		let mut crs = Crs::new();
		crs.insert("init", format!("epsg:{code}"));
		crs
	}

	/// Parses a PROJ.4 definition like `+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs`.
	///
	/// Bare flags become `true`. The `+type=crs` marker added by PROJ 6+ is skipped.
	pub fn from_proj4(definition: &str) -> Crs {
		let mut crs = Crs::new();
		for token in definition.split_whitespace() {
			let Some(token) = token.strip_prefix('+') else {
				continue;
			};
			match token.split_once('=') {
				Some(("type", "crs")) => {}
				Some((key, value)) => crs.insert(key, CrsValue::parse(value)),
				None if !token.is_empty() => crs.insert(token, CrsValue::Flag(true)),
				None => {}
			}
		}
		crs
	}

	/// Sets `key`, replacing an existing value in place.
	pub fn insert(&mut self, key: &str, value: impl Into<CrsValue>) {
		let value = value.into();
		if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
			entry.1 = value;
		} else {
			self.entries.push((key.to_string(), value));
		}
	}

	pub fn get(&self, key: &str) -> Option<&CrsValue> {
		self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Returns the EPSG code for `{"init": "epsg:<code>"}` systems.
	pub fn epsg(&self) -> Option<u32> {
		match self.get("init")? {
			CrsValue::Text(text) => text.strip_prefix("epsg:")?.parse().ok(),
			_ => None,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &CrsValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl Serialize for Crs {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, value) in &self.entries {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl fmt::Display for Crs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
		write!(f, "{}", parts.join(" "))
	}
}
