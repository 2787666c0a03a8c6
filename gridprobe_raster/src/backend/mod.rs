//! Raster readers.
//!
//! A [`RasterBackend`] turns the raw bytes of an uploaded file into [`RasterAttributes`].
//! The built-in [`GeoTiffBackend`] handles (Geo)TIFF files without native dependencies.
//! With the `gdal` feature, [`GdalBackend`] reads every format GDAL has a driver for and
//! becomes the default.

#[cfg(feature = "gdal")]
mod gdal;
mod geotiff;

#[cfg(feature = "gdal")]
pub use gdal::GdalBackend;
pub use geotiff::GeoTiffBackend;

use crate::RasterAttributes;
use anyhow::Result;
use std::fmt::Debug;

pub trait RasterBackend: Debug + Send + Sync {
	/// Short identifier used in log messages.
	fn name(&self) -> &'static str;

	/// Reads the attributes of a raster held entirely in memory.
	fn read(&self, bytes: &[u8]) -> Result<RasterAttributes>;
}

/// The backend used by [`read_attributes`](crate::read_attributes).
pub fn default_backend() -> Box<dyn RasterBackend> {
	#[cfg(feature = "gdal")]
	{
		Box::new(GdalBackend)
	}
	#[cfg(not(feature = "gdal"))]
	{
		Box::new(GeoTiffBackend)
	}
}
