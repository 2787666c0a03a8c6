use super::{AffineTransform, BoundingBox, Crs, DataType};
use serde::Serialize;

/// Metadata summary of a raster file.
///
/// Field order matches the JSON document returned by the attributes endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RasterAttributes {
	pub width: u32,
	pub height: u32,
	/// Number of bands (samples per pixel).
	pub bands: u32,
	/// `None` serializes as `null` for rasters without a coordinate reference system.
	pub crs: Option<Crs>,
	pub bbox: BoundingBox,
	/// Short name of the format driver, e.g. `GTiff`.
	pub driver: String,
	/// Data type of the first band.
	pub dtype: DataType,
	pub transform: AffineTransform,
}

impl RasterAttributes {
	/// Builds the attributes, deriving `bbox` from `transform` and the raster size.
	pub fn new(
		width: u32,
		height: u32,
		bands: u32,
		crs: Option<Crs>,
		driver: &str,
		dtype: DataType,
		transform: AffineTransform,
	) -> RasterAttributes {
		RasterAttributes {
			width,
			height,
			bands,
			crs,
			bbox: transform.bounds(width, height),
			driver: driver.to_string(),
			dtype,
			transform,
		}
	}
}
