//! Reading `multipart/form-data` uploads into memory.

use super::error::ApiError;
use axum::{extract::Multipart, http::StatusCode};
use bytes::{Bytes, BytesMut};

/// One multipart field.
#[derive(Debug)]
pub struct Part {
	pub name: String,
	pub file_name: Option<String>,
	pub bytes: Bytes,
}

/// All fields of a multipart request, in the order they were sent.
#[derive(Debug, Default)]
pub struct UploadForm {
	parts: Vec<Part>,
}

impl UploadForm {
	/// Reads every field, failing with 413 once the fields together exceed `max_bytes`.
	pub async fn read(mut multipart: Multipart, max_bytes: usize) -> Result<UploadForm, ApiError> {
		let mut parts = Vec::new();
		let mut total = 0usize;

		while let Some(mut field) = multipart.next_field().await.map_err(|e| multipart_error(&e, max_bytes))? {
			let name = field.name().unwrap_or_default().to_string();
			let file_name = field.file_name().map(ToString::to_string);
			let mut buffer = BytesMut::new();

			while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(&e, max_bytes))? {
				total += chunk.len();
				if total > max_bytes {
					return Err(ApiError::PayloadTooLarge { limit: max_bytes });
				}
				buffer.extend_from_slice(&chunk);
			}

			log::trace!("multipart field '{name}' ({file_name:?}): {} bytes", buffer.len());
			parts.push(Part {
				name,
				file_name,
				bytes: buffer.freeze(),
			});
		}

		Ok(UploadForm { parts })
	}

	/// Removes and returns the uploaded file.
	///
	/// Prefers the field called `name`; otherwise takes the first field that carries a file name.
	/// An empty file is rejected.
	pub fn take_file(&mut self, name: &str) -> Result<Part, ApiError> {
		let index = self
			.parts
			.iter()
			.position(|p| p.name == name)
			.or_else(|| self.parts.iter().position(|p| p.file_name.is_some()))
			.ok_or_else(|| ApiError::bad_request(format!("missing file upload in field '{name}'")))?;

		let part = self.parts.remove(index);
		if part.bytes.is_empty() {
			return Err(ApiError::bad_request(format!("uploaded file '{}' is empty", part.name)));
		}
		Ok(part)
	}

	/// Value of a plain text field; a value that is not UTF-8 is an invalid `name` parameter.
	pub fn text(&self, name: &'static str) -> Result<Option<&str>, ApiError> {
		let Some(part) = self.parts.iter().find(|p| p.name == name && p.file_name.is_none()) else {
			return Ok(None);
		};
		std::str::from_utf8(&part.bytes)
			.map(Some)
			.map_err(|err| ApiError::invalid_parameter(name, &anyhow::anyhow!("not UTF-8 text: {err}")))
	}

	pub fn len(&self) -> usize {
		self.parts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}
}

fn multipart_error(err: &axum::extract::multipart::MultipartError, max_bytes: usize) -> ApiError {
	if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
		ApiError::PayloadTooLarge { limit: max_bytes }
	} else {
		ApiError::bad_request(format!("failed to parse multipart data: {}", err.body_text()))
	}
}
