//! Errors returned by the HTTP handlers.
//!
//! Every failure ends up as a JSON body `{"error": "<message>"}` with a matching status code.
//! Internal errors are logged with their full chain and answered with a generic message.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
	/// Malformed multipart body, missing or empty upload.
	#[error("{0}")]
	BadRequest(String),

	/// A query or form parameter failed validation.
	#[error("invalid parameter '{name}': {message}")]
	InvalidParameter { name: &'static str, message: String },

	/// The upload was received but could not be decoded.
	#[error("{0:#}")]
	Unprocessable(anyhow::Error),

	#[error("upload exceeds the limit of {limit} bytes")]
	PayloadTooLarge { limit: usize },

	#[error(transparent)]
	Internal(#[from] anyhow::Error),
}

impl ApiError {
	pub fn bad_request(message: impl Into<String>) -> ApiError {
		ApiError::BadRequest(message.into())
	}

	pub fn invalid_parameter(name: &'static str, err: &anyhow::Error) -> ApiError {
		ApiError::InvalidParameter {
			name,
			message: format!("{err:#}"),
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadRequest(_) | ApiError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
			ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
			ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Message safe to show to clients.
	pub fn user_message(&self) -> String {
		match self {
			ApiError::Internal(_) => "Internal Server Error".to_string(),
			other => other.to_string(),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		match &self {
			ApiError::Internal(err) => log::error!("internal error: {err:?}"),
			other => log::warn!("client error: {other}"),
		}
		(self.status_code(), Json(json!({ "error": self.user_message() }))).into_response()
	}
}
