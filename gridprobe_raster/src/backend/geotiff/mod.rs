//! Built-in GeoTIFF reader based on the `tiff` crate.
//!
//! Georeferencing is taken from `ModelTransformationTag`, or from `ModelPixelScaleTag` plus
//! the first `ModelTiepointTag`. Rasters without either get the identity transform. The CRS
//! comes from the GeoKey directory, see [`GeoKeyDirectory::to_crs`].

mod geokeys;

use super::RasterBackend;
use crate::{AffineTransform, DataType, RasterAttributes};
use anyhow::{Result, ensure};
use geokeys::GeoKeyDirectory;
use gridprobe_derive::context;
use std::io::{Cursor, Read, Seek};
use tiff::{
	decoder::{Decoder, ifd::Value},
	tags::Tag,
};

const DRIVER: &str = "GTiff";

#[derive(Clone, Copy, Debug, Default)]
pub struct GeoTiffBackend;

impl RasterBackend for GeoTiffBackend {
	fn name(&self) -> &'static str {
		"geotiff"
	}

	#[context("Failed to read GeoTIFF ({} bytes)", bytes.len())]
	fn read(&self, bytes: &[u8]) -> Result<RasterAttributes> {
		ensure!(!bytes.is_empty(), "file is empty");
		let mut decoder = Decoder::new(Cursor::new(bytes))?;

		let (width, height) = decoder.dimensions()?;
		let bands = find_u32(&mut decoder, Tag::SamplesPerPixel)?.map_or(1, |v| v[0]);
		let bits = find_u32(&mut decoder, Tag::BitsPerSample)?.map_or(1, |v| v[0]);
		let format = find_u32(&mut decoder, Tag::SampleFormat)?.map_or(1, |v| v[0]);
		let dtype = DataType::from_tiff(u16::try_from(format)?, u16::try_from(bits)?)?;
		log::trace!("TIFF {width}x{height}, {bands} bands of {dtype}");

		let geokeys = read_geokeys(&mut decoder)?;
		let mut transform = read_transform(&mut decoder)?;
		if geokeys.as_ref().is_some_and(GeoKeyDirectory::is_pixel_is_point) {
			transform = transform.shifted(-0.5, -0.5);
		}
		let crs = geokeys.as_ref().and_then(GeoKeyDirectory::to_crs);
		log::trace!("transform {transform:?}, crs {crs:?}");

		Ok(RasterAttributes::new(width, height, bands, crs, DRIVER, dtype, transform))
	}
}

fn find_u32<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> Result<Option<Vec<u32>>> {
	let Some(value) = decoder.find_tag(tag)? else {
		return Ok(None);
	};
	let values = match value {
		Value::List(list) => list.into_iter().map(Value::into_u32).collect::<Result<Vec<_>, _>>()?,
		scalar => vec![scalar.into_u32()?],
	};
	Ok(Some(values).filter(|v| !v.is_empty()))
}

fn find_f64<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> Result<Option<Vec<f64>>> {
	let Some(value) = decoder.find_tag(tag)? else {
		return Ok(None);
	};
	Ok(Some(match value {
		Value::List(list) => list.into_iter().map(Value::into_f64).collect::<Result<Vec<_>, _>>()?,
		scalar => vec![scalar.into_f64()?],
	}))
}

fn read_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<AffineTransform> {
	if let Some(matrix) = find_f64(decoder, Tag::ModelTransformationTag)? {
		return AffineTransform::from_model_transformation(&matrix);
	}
	let scale = find_f64(decoder, Tag::ModelPixelScaleTag)?;
	let tiepoint = find_f64(decoder, Tag::ModelTiepointTag)?;
	match (scale, tiepoint) {
		(Some(scale), Some(tiepoint)) => AffineTransform::from_tiepoint(&scale, &tiepoint),
		_ => Ok(AffineTransform::IDENTITY),
	}
}

fn read_geokeys<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<GeoKeyDirectory>> {
	let Some(directory) = find_u32(decoder, Tag::GeoKeyDirectoryTag)? else {
		return Ok(None);
	};
	let directory = directory
		.into_iter()
		.map(u16::try_from)
		.collect::<Result<Vec<u16>, _>>()?;
	let doubles = find_f64(decoder, Tag::GeoDoubleParamsTag)?.unwrap_or_default();
	let ascii = match decoder.find_tag(Tag::GeoAsciiParamsTag)? {
		Some(value) => value.into_string()?,
		None => String::new(),
	};
	Ok(Some(GeoKeyDirectory::parse(&directory, &doubles, &ascii)?))
}
