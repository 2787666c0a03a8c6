//! CORS layer built from the compiled `cors.allowed_origins` patterns.

use crate::config::OriginPattern;
use axum::http::{HeaderValue, Method, header, request::Parts};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds a [`CorsLayer`] allowing `GET`, `POST` and `OPTIONS` from origins matching any pattern.
pub fn build_cors_layer(patterns: Vec<OriginPattern>, max_age_seconds: u64) -> CorsLayer {
	log::debug!("CORS origin patterns: {patterns:?}");

	CorsLayer::new()
		.allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
			let origin = origin.to_str().unwrap_or_default();
			patterns.iter().any(|p| p.matches(origin))
		}))
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([header::CONTENT_TYPE])
		.max_age(Duration::from_secs(max_age_seconds))
}
