//! Router composition: endpoints and the request body limit.

use super::handlers::{AppState, attributes, thumbnail};
use axum::{
	Router,
	extract::DefaultBodyLimit,
	routing::{get, post},
};

/// Room for multipart boundaries, part headers and text fields on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
	Router::new()
		.route("/status", get(|| async { "ready!" }))
		.route("/attributes", post(attributes))
		.route("/thumbnail", post(thumbnail))
		.layer(DefaultBodyLimit::max(state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD)))
		.with_state(state)
}
