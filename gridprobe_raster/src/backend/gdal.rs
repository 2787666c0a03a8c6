use super::RasterBackend;
use crate::{AffineTransform, Crs, DataType, RasterAttributes};
use anyhow::{Context, Result, ensure};
use gdal::{Dataset, spatial_ref::SpatialRef, vsi};
use gridprobe_derive::context;

/// Reads any raster format GDAL has a driver for.
///
/// The bytes are exposed to GDAL as a temporary `/vsimem/` file, so nothing touches the disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct GdalBackend;

impl RasterBackend for GdalBackend {
	fn name(&self) -> &'static str {
		"gdal"
	}

	#[context("Failed to read raster with GDAL ({} bytes)", bytes.len())]
	fn read(&self, bytes: &[u8]) -> Result<RasterAttributes> {
		ensure!(!bytes.is_empty(), "file is empty");
		let file = MemFile::new(bytes)?;
		let dataset = Dataset::open(&file.path).context("GDAL could not open the upload")?;

		let (width, height) = dataset.raster_size();
		let bands = dataset.raster_count();
		ensure!(bands > 0, "raster has no bands");
		log::trace!("GDAL {width}x{height}, {bands} bands");

		let dtype = DataType::from_gdal_name(&dataset.rasterband(1)?.band_type().name())?;
		// GDAL reports an error for rasters without a geotransform.
		let transform = dataset
			.geo_transform()
			.map_or(AffineTransform::IDENTITY, AffineTransform::from_gdal);
		let crs = dataset.spatial_ref().ok().map(|srs| crs_from_srs(&srs)).transpose()?;
		let driver = dataset.driver().short_name();

		Ok(RasterAttributes::new(
			u32::try_from(width)?,
			u32::try_from(height)?,
			u32::try_from(bands)?,
			crs,
			&driver,
			dtype,
			transform,
		))
	}
}

fn crs_from_srs(srs: &SpatialRef) -> Result<Crs> {
	if let Ok(authority) = srs.authority()
		&& let Some(code) = authority.strip_prefix("EPSG:")
		&& let Ok(code) = code.parse::<u32>()
	{
		return Ok(Crs::from_epsg(code));
	}
	Ok(Crs::from_proj4(&srs.to_proj4()?))
}

/// In-memory GDAL file, unlinked on drop.
struct MemFile {
	path: String,
}

impl MemFile {
	fn new(bytes: &[u8]) -> Result<MemFile> {
		let path = format!("/vsimem/gridprobe-{}", uuid::Uuid::new_v4());
		vsi::create_mem_file(&path, bytes.to_vec())?;
		Ok(MemFile { path })
	}
}

impl Drop for MemFile {
	fn drop(&mut self) {
		if let Err(err) = vsi::unlink_mem_file(&self.path) {
			log::warn!("failed to unlink {}: {err}", self.path);
		}
	}
}
