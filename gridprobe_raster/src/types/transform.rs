//! Affine geotransform and the bounding box derived from it.
//!
//! Coefficients follow the usual `a, b, c, d, e, f` naming:
//!
//! ```text
//! x = a * col + b * row + c
//! y = d * col + e * row + f
//! ```

use anyhow::{Result, ensure};
use serde::{Serialize, Serializer};

/// Six-coefficient affine transform mapping pixel (col, row) to georeferenced (x, y).
///
/// Serialized as `[a, b, c, d, e, f]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AffineTransform([f64; 6]);

impl AffineTransform {
	/// The transform GDAL reports for rasters without georeferencing.
	pub const IDENTITY: AffineTransform = AffineTransform([1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

	pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> AffineTransform {
		AffineTransform([a, b, c, d, e, f])
	}

	/// Converts a GDAL geotransform `[c, a, b, f, d, e]`.
	pub fn from_gdal(gt: [f64; 6]) -> AffineTransform {
		AffineTransform([gt[1], gt[2], gt[0], gt[4], gt[5], gt[3]])
	}

	/// Builds the transform from GeoTIFF `ModelPixelScale` and the first `ModelTiepoint`.
	///
	/// `scale` is `[sx, sy, sz]`, `tiepoint` is `[i, j, k, x, y, z]`. The raster row axis points
	/// south, so `e = -sy`.
	pub fn from_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Result<AffineTransform> {
		ensure!(scale.len() >= 2, "ModelPixelScale needs at least 2 values, got {}", scale.len());
		ensure!(
			tiepoint.len() >= 6,
			"ModelTiepoint needs at least 6 values, got {}",
			tiepoint.len()
		);
		let (sx, sy) = (scale[0], scale[1]);
		let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
		Ok(AffineTransform([sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy]))
	}

	/// Builds the transform from a row-major 4x4 GeoTIFF `ModelTransformation` matrix.
	pub fn from_model_transformation(matrix: &[f64]) -> Result<AffineTransform> {
		ensure!(
			matrix.len() >= 16,
			"ModelTransformation needs 16 values, got {}",
			matrix.len()
		);
		Ok(AffineTransform([
			matrix[0], matrix[1], matrix[3], matrix[4], matrix[5], matrix[7],
		]))
	}

	pub fn coefficients(&self) -> [f64; 6] {
		self.0
	}

	/// Maps a pixel position to georeferenced coordinates.
	pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
		let [a, b, c, d, e, f] = self.0;
		(a * col + b * row + c, d * col + e * row + f)
	}

	/// `true` when the transform has no rotation or shear terms.
	pub fn is_rectilinear(&self) -> bool {
		self.0[1] == 0.0 && self.0[3] == 0.0
	}

	/// Moves the origin by a fractional number of pixels.
	pub fn shifted(&self, cols: f64, rows: f64) -> AffineTransform {
		let (c, f) = self.apply(cols, rows);
		let [a, b, _, d, e, _] = self.0;
		AffineTransform([a, b, c, d, e, f])
	}

	/// Bounds of a `width` x `height` raster.
	///
	/// Rectilinear transforms report `(c, f + e*h, c + a*w, f)` as is, so a south-up raster keeps
	/// `bottom > top`. Rotated transforms report the envelope of the four corners.
	pub fn bounds(&self, width: u32, height: u32) -> BoundingBox {
		let (w, h) = (f64::from(width), f64::from(height));
		let [a, _, c, _, e, f] = self.0;

		if self.is_rectilinear() {
			return BoundingBox {
				left: c,
				bottom: f + e * h,
				right: c + a * w,
				top: f,
			};
		}

		let corners = [self.apply(0.0, 0.0), self.apply(w, 0.0), self.apply(0.0, h), self.apply(w, h)];
		let xs = corners.iter().map(|p| p.0);
		let ys = corners.iter().map(|p| p.1);
		BoundingBox {
			left: xs.clone().fold(f64::INFINITY, f64::min),
			bottom: ys.clone().fold(f64::INFINITY, f64::min),
			right: xs.fold(f64::NEG_INFINITY, f64::max),
			top: ys.fold(f64::NEG_INFINITY, f64::max),
		}
	}
}

impl Default for AffineTransform {
	fn default() -> Self {
		AffineTransform::IDENTITY
	}
}

/// Raster extent in the raster's own coordinate system.
///
/// Serialized as `[left, bottom, right, top]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	pub left: f64,
	pub bottom: f64,
	pub right: f64,
	pub top: f64,
}

impl BoundingBox {
	pub fn as_array(&self) -> [f64; 4] {
		[self.left, self.bottom, self.right, self.top]
	}
}

impl Serialize for BoundingBox {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.as_array().serialize(serializer)
	}
}
