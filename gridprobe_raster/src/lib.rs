//! Raster metadata extraction.
//!
//! [`read_attributes`] reads an in-memory raster file and returns its dimensions, band
//! count, coordinate reference system, bounding box, driver, data type and geotransform.
//!
//! ```no_run
//! let bytes = std::fs::read("dem.tif")?;
//! let attributes = gridprobe_raster::read_attributes(&bytes)?;
//! println!("{}", serde_json::to_string(&attributes)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod backend;
mod types;

pub use backend::{GeoTiffBackend, RasterBackend, default_backend};
pub use types::*;

use anyhow::Result;

/// Reads raster attributes with the [`default_backend`].
pub fn read_attributes(bytes: &[u8]) -> Result<RasterAttributes> {
	let backend = default_backend();
	log::debug!("reading {} bytes with the {} backend", bytes.len(), backend.name());
	backend.read(bytes)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_input_fails() {
		let err = read_attributes(&[]).unwrap_err();
		assert!(format!("{err:#}").contains("empty"), "{err:#}");
	}
}
