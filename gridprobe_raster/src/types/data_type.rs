use anyhow::{Result, bail};
use serde::{Serialize, Serializer};
use std::fmt;

/// Pixel data type of a raster band, named the way numpy/rasterio name them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
	Uint8,
	Int8,
	Uint16,
	Int16,
	Uint32,
	Int32,
	Uint64,
	Int64,
	Float32,
	Float64,
	ComplexInt16,
	Complex64,
	Complex128,
}

impl DataType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Uint8 => "uint8",
			Self::Int8 => "int8",
			Self::Uint16 => "uint16",
			Self::Int16 => "int16",
			Self::Uint32 => "uint32",
			Self::Int32 => "int32",
			Self::Uint64 => "uint64",
			Self::Int64 => "int64",
			Self::Float32 => "float32",
			Self::Float64 => "float64",
			Self::ComplexInt16 => "complex_int16",
			Self::Complex64 => "complex64",
			Self::Complex128 => "complex128",
		}
	}

	/// Derives the type from the TIFF `SampleFormat` and `BitsPerSample` tags.
	///
	/// Integer samples widen to the next byte-aligned type the way GDAL reads them, so 1 to 7 bit
	/// samples become `uint8`, 12 bit `uint16` and 24 bit `uint32`. Half floats widen to `float32`.
	pub fn from_tiff(sample_format: u16, bits_per_sample: u16) -> Result<DataType> {
		Ok(match (sample_format, bits_per_sample) {
			(1 | 4, 1..=8) => Self::Uint8,
			(1 | 4, 9..=16) => Self::Uint16,
			(1 | 4, 17..=32) => Self::Uint32,
			(1 | 4, 33..=64) => Self::Uint64,
			(2, 1..=8) => Self::Int8,
			(2, 9..=16) => Self::Int16,
			(2, 17..=32) => Self::Int32,
			(2, 33..=64) => Self::Int64,
			(3, 16 | 32) => Self::Float32,
			(3, 64) => Self::Float64,
			(5, 32) => Self::ComplexInt16,
			(6, 64) => Self::Complex64,
			(6, 128) => Self::Complex128,
			_ => bail!("unsupported sample layout: SampleFormat={sample_format}, BitsPerSample={bits_per_sample}"),
		})
	}

	/// Maps GDAL data type names (`Byte`, `UInt16`, `CFloat32`, ...).
	pub fn from_gdal_name(name: &str) -> Result<DataType> {
		Ok(match name {
			"Byte" => Self::Uint8,
			"Int8" => Self::Int8,
			"UInt16" => Self::Uint16,
			"Int16" => Self::Int16,
			"UInt32" => Self::Uint32,
			"Int32" => Self::Int32,
			"UInt64" => Self::Uint64,
			"Int64" => Self::Int64,
			"Float32" => Self::Float32,
			"Float64" => Self::Float64,
			"CInt16" => Self::ComplexInt16,
			"CFloat32" => Self::Complex64,
			"CFloat64" => Self::Complex128,
			_ => bail!("unsupported GDAL data type '{name}'"),
		})
	}
}

impl fmt::Display for DataType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for DataType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}
