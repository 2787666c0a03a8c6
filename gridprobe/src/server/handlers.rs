//! Handlers for the upload endpoints.
//!
//! - `attributes` reports raster metadata as JSON.
//! - `thumbnail` renders an RGB PNG, optionally stretched to a square.
//!
//! Decoding and encoding are CPU bound and run on the blocking pool.

use super::{error::ApiError, upload::UploadForm};
use crate::Config;
use anyhow::anyhow;
use axum::{
	Json,
	extract::{Multipart, Query, State},
	http::header,
	response::{IntoResponse, Response},
};
use gridprobe_image::{Resolution, Thumbnail, decode, render_thumbnail};
use gridprobe_raster::{RasterAttributes, read_attributes};
use serde::Deserialize;

/// Multipart field carrying the raster for `/attributes`.
pub const ATTRIBUTES_FIELD: &str = "image_file";
/// Multipart field carrying the image for `/thumbnail`.
pub const THUMBNAIL_FIELD: &str = "image";
/// Query parameter and multipart text field with the thumbnail edge length.
pub const RESOLUTION_FIELD: &str = "resolution";

/// Settings shared by all handlers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppState {
	pub max_upload_bytes: usize,
	pub max_resolution: u32,
	pub png_speed: u8,
}

impl AppState {
	pub fn from_config(config: &Config) -> AppState {
		AppState {
			max_upload_bytes: config.server.max_upload_bytes(),
			max_resolution: config.thumbnail.max_resolution(),
			png_speed: config.thumbnail.png_speed(),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct ThumbnailQuery {
	pub resolution: Option<String>,
}

pub async fn attributes(
	State(state): State<AppState>,
	multipart: Multipart,
) -> Result<Json<RasterAttributes>, ApiError> {
	let mut form = UploadForm::read(multipart, state.max_upload_bytes).await?;
	let upload = form.take_file(ATTRIBUTES_FIELD)?;
	log::debug!(
		"attributes request: {} bytes in field '{}' ({:?})",
		upload.bytes.len(),
		upload.name,
		upload.file_name
	);

	let attributes = blocking(move || read_attributes(&upload.bytes))
		.await?
		.map_err(ApiError::Unprocessable)?;
	Ok(Json(attributes))
}

pub async fn thumbnail(
	State(state): State<AppState>,
	Query(query): Query<ThumbnailQuery>,
	multipart: Multipart,
) -> Result<Response, ApiError> {
	// the query parameter wins and is checked before the body is read
	let from_query = query
		.resolution
		.as_deref()
		.map(|text| parse_resolution(text, state.max_resolution))
		.transpose()?;

	let mut form = UploadForm::read(multipart, state.max_upload_bytes).await?;
	let resolution = match from_query {
		Some(resolution) => Some(resolution),
		None => form
			.text(RESOLUTION_FIELD)?
			.map(|text| parse_resolution(text, state.max_resolution))
			.transpose()?,
	};
	let upload = form.take_file(THUMBNAIL_FIELD)?;
	log::debug!(
		"thumbnail request: {} bytes in field '{}', resolution {resolution:?}",
		upload.bytes.len(),
		upload.name
	);

	let png_speed = state.png_speed;
	let thumbnail: Thumbnail = blocking(move || {
		let image = decode(&upload.bytes).map_err(ApiError::Unprocessable)?;
		Ok::<_, ApiError>(render_thumbnail(image, resolution, png_speed)?)
	})
	.await??;
	log::debug!(
		"thumbnail rendered: {}x{}, {} bytes",
		thumbnail.width,
		thumbnail.height,
		thumbnail.png.len()
	);

	Ok(([(header::CONTENT_TYPE, "image/png")], thumbnail.png).into_response())
}

fn parse_resolution(text: &str, max: u32) -> Result<Resolution, ApiError> {
	Resolution::parse(text)
		.and_then(|r| r.at_most(max))
		.map_err(|err| ApiError::invalid_parameter(RESOLUTION_FIELD, &err))
}

async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
	T: Send + 'static,
	F: FnOnce() -> T + Send + 'static,
{
	tokio::task::spawn_blocking(work)
		.await
		.map_err(|err| ApiError::Internal(anyhow!("blocking task failed: {err}")))
}
