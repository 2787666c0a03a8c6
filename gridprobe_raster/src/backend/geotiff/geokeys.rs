//! GeoKey directory as stored in the `GeoKeyDirectoryTag` of a GeoTIFF.
//!
//! The directory is a list of `u16`: a four-value header (version, revision, minor revision,
//! key count) followed by one `[key id, location, count, value]` entry per key. `location`
//! says where the value lives: `0` means `value` is the value itself, otherwise it names the
//! tag (`GeoDoubleParamsTag`, `GeoAsciiParamsTag` or the directory itself) and `value` is an
//! offset into it.

use crate::{Crs, CrsValue};
use anyhow::{Result, ensure};

pub const MODEL_TYPE: u16 = 1024;
pub const RASTER_TYPE: u16 = 1025;
pub const GEOGRAPHIC_TYPE: u16 = 2048;
pub const PROJECTED_CS_TYPE: u16 = 3072;

/// `GTModelTypeGeoKey` value for projected systems.
pub const MODEL_TYPE_PROJECTED: u16 = 1;
/// `GTRasterTypeGeoKey` value for point-registered rasters.
pub const RASTER_PIXEL_IS_POINT: u16 = 2;
pub const USER_DEFINED: u16 = 32767;

const LOCATION_INLINE: u16 = 0;
const LOCATION_DIRECTORY: u16 = 34735;
const LOCATION_DOUBLES: u16 = 34736;
const LOCATION_ASCII: u16 = 34737;

#[derive(Clone, Debug, PartialEq)]
pub enum GeoKeyValue {
	Short(u16),
	Shorts(Vec<u16>),
	Doubles(Vec<f64>),
	Ascii(String),
}

impl From<&GeoKeyValue> for CrsValue {
	fn from(value: &GeoKeyValue) -> Self {
		fn join<T: ToString>(values: &[T]) -> String {
			values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
		}
		match value {
			GeoKeyValue::Short(v) => CrsValue::Integer(i64::from(*v)),
			GeoKeyValue::Doubles(v) if v.len() == 1 => CrsValue::Float(v[0]),
			GeoKeyValue::Doubles(v) => CrsValue::Text(join(v)),
			GeoKeyValue::Shorts(v) => CrsValue::Text(join(v)),
			GeoKeyValue::Ascii(v) => CrsValue::Text(v.clone()),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoKeyDirectory {
	keys: Vec<(u16, GeoKeyValue)>,
}

impl GeoKeyDirectory {
	/// Resolves every entry of `directory` against the double and ASCII parameter tags.
	///
	/// Entries pointing to an unknown location are skipped.
	pub fn parse(directory: &[u16], doubles: &[f64], ascii: &str) -> Result<GeoKeyDirectory> {
		ensure!(directory.len() >= 4, "GeoKey directory header is truncated");
		let count = usize::from(directory[3]);
		ensure!(
			directory.len() >= 4 + 4 * count,
			"GeoKey directory declares {count} keys but holds only {} values",
			directory.len()
		);

		let mut keys = Vec::with_capacity(count);
		for entry in directory[4..4 + 4 * count].chunks_exact(4) {
			let (id, location, len, offset) = (entry[0], entry[1], usize::from(entry[2]), usize::from(entry[3]));
			let value = match location {
				LOCATION_INLINE => GeoKeyValue::Short(entry[3]),
				LOCATION_DIRECTORY => {
					let values = directory.get(offset..offset + len);
					GeoKeyValue::Shorts(slice_or_fail(values, id, "directory")?.to_vec())
				}
				LOCATION_DOUBLES => {
					let values = doubles.get(offset..offset + len);
					GeoKeyValue::Doubles(slice_or_fail(values, id, "GeoDoubleParams")?.to_vec())
				}
				LOCATION_ASCII => {
					let text = ascii.get(offset..offset + len);
					let text = slice_or_fail(text, id, "GeoAsciiParams")?;
					GeoKeyValue::Ascii(text.trim_end_matches(['|', '\0']).to_string())
				}
				other => {
					log::warn!("skipping GeoKey {id} stored in unknown tag {other}");
					continue;
				}
			};
			keys.push((id, value));
		}
		Ok(GeoKeyDirectory { keys })
	}

	pub fn get(&self, id: u16) -> Option<&GeoKeyValue> {
		self.keys.iter().find(|(k, _)| *k == id).map(|(_, v)| v)
	}

	pub fn short(&self, id: u16) -> Option<u16> {
		match self.get(id)? {
			GeoKeyValue::Short(v) => Some(*v),
			_ => None,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	pub fn is_pixel_is_point(&self) -> bool {
		self.short(RASTER_TYPE) == Some(RASTER_PIXEL_IS_POINT)
	}

	/// Coordinate reference system described by the keys.
	///
	/// A registered projected EPSG code wins. The geographic code only describes the whole system
	/// when no projected system is declared. Otherwise every key is reported under its parameter
	/// name, which is what user-defined systems carry.
	pub fn to_crs(&self) -> Option<Crs> {
		let registered = |id| self.short(id).filter(|code| (1..USER_DEFINED).contains(code));
		if let Some(code) = registered(PROJECTED_CS_TYPE) {
			return Some(Crs::from_epsg(u32::from(code)));
		}
		let projected = self.get(PROJECTED_CS_TYPE).is_some() || self.short(MODEL_TYPE) == Some(MODEL_TYPE_PROJECTED);
		if !projected && let Some(code) = registered(GEOGRAPHIC_TYPE) {
			return Some(Crs::from_epsg(u32::from(code)));
		}
		if self.is_empty() {
			return None;
		}
		let mut crs = Crs::new();
		for (id, value) in &self.keys {
			crs.insert(&key_name(*id), CrsValue::from(value));
		}
		Some(crs)
	}
}

fn slice_or_fail<'a, T: ?Sized>(value: Option<&'a T>, id: u16, source: &str) -> Result<&'a T> {
	value.ok_or_else(|| anyhow::anyhow!("GeoKey {id} points outside of {source}"))
}

fn key_name(id: u16) -> String {
	let name = match id {
		1024 => "model_type",
		1025 => "raster_type",
		1026 => "citation",
		2048 => "geographic_type",
		2049 => "geog_citation",
		2050 => "geog_geodetic_datum",
		2051 => "geog_prime_meridian",
		2052 => "geog_linear_units",
		2053 => "geog_linear_unit_size",
		2054 => "geog_angular_units",
		2055 => "geog_angular_unit_size",
		2056 => "geog_ellipsoid",
		2057 => "geog_semi_major_axis",
		2058 => "geog_semi_minor_axis",
		2059 => "geog_inv_flattening",
		2060 => "geog_azimuth_units",
		2061 => "geog_prime_meridian_long",
		3072 => "projected_cs_type",
		3073 => "pcs_citation",
		3074 => "projection",
		3075 => "proj_coord_trans",
		3076 => "proj_linear_units",
		3077 => "proj_linear_unit_size",
		3078 => "proj_std_parallel_1",
		3079 => "proj_std_parallel_2",
		3080 => "proj_nat_origin_long",
		3081 => "proj_nat_origin_lat",
		3082 => "proj_false_easting",
		3083 => "proj_false_northing",
		3088 => "proj_center_long",
		3089 => "proj_center_lat",
		3092 => "proj_scale_at_nat_origin",
		4096 => "vertical_cs_type",
		4097 => "vertical_citation",
		4098 => "vertical_datum",
		4099 => "vertical_units",
		_ => return format!("key_{id}"),
	};
	name.to_string()
}
