//! Server lifecycle: building the middleware stack, binding, graceful shutdown.
//!
//! Request handling lives in `handlers`, endpoint wiring in `routes`, origin matching in `cors`.
//! This module owns the cross-cutting layers (CORS, extra response headers, backpressure,
//! timeouts, panic catching) and the listening task.

use super::{cors, handlers::AppState, routes};
use crate::{Config, config::OriginPattern};
use anyhow::{Context, Result};
use axum::{
	BoxError, Router,
	error_handling::HandleErrorLayer,
	http::{HeaderName, HeaderValue, StatusCode, header},
	response::IntoResponse,
};
use std::{net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower::{
	ServiceBuilder, buffer::BufferLayer, limit::ConcurrencyLimitLayer, load_shed::LoadShedLayer, timeout::TimeoutLayer,
};
use tower_http::{catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer};

/// HTTP server for the probe endpoints.
///
/// Starting a running server restarts it; stopping a stopped server does nothing.
///
/// ```no_run
/// # async fn demo() -> anyhow::Result<()> {
/// let config = gridprobe::Config::from_string("server:\n  port: 8000\n")?;
/// let mut server = gridprobe::server::ProbeServer::from_config(&config)?;
/// server.start().await?;
/// // ...
/// server.stop().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProbeServer {
	ip: String,
	port: u16,
	state: AppState,
	origins: Vec<OriginPattern>,
	cors_max_age: u64,
	request_timeout: Duration,
	concurrency_limit: usize,
	extra_headers: Vec<(HeaderName, HeaderValue)>,
	local_addr: Option<SocketAddr>,
	exit_signal: Option<oneshot::Sender<()>>,
	join: Option<JoinHandle<()>>,
}

impl ProbeServer {
	/// Takes over all settings from `config`; fails on origin patterns or response headers that do not compile.
	pub fn from_config(config: &Config) -> Result<ProbeServer> {
		let mut extra_headers = config
			.extra_response_headers
			.iter()
			.map(|(name, value)| {
				let name =
					HeaderName::try_from(name.as_str()).with_context(|| format!("invalid response header name '{name}'"))?;
				let value = HeaderValue::try_from(value.as_str())
					.with_context(|| format!("invalid value for response header '{name}'"))?;
				Ok::<_, anyhow::Error>((name, value))
			})
			.collect::<Result<Vec<_>>>()?;
		extra_headers.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));

		Ok(ProbeServer {
			ip: config.server.ip().to_string(),
			port: config.server.port(),
			state: AppState::from_config(config),
			origins: config.cors.origin_patterns()?,
			cors_max_age: config.cors.max_age_seconds(),
			request_timeout: config.server.request_timeout(),
			concurrency_limit: config.server.concurrency_limit(),
			extra_headers,
			local_addr: None,
			exit_signal: None,
			join: None,
		})
	}

	/// Binds the listener and spawns the serving task.
	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		log::info!("starting server");

		let router = routes::build_router(self.state)
			.layer(cors::build_cors_layer(self.origins.clone(), self.cors_max_age));
		let mut router = protect(router, self.request_timeout, self.concurrency_limit);

		for (name, value) in &self.extra_headers {
			router = router.layer(SetResponseHeaderLayer::overriding(name.clone(), value.clone()));
		}

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("Failed to bind {addr}"))?;
		let local_addr = listener.local_addr()?;
		log::info!("listening on http://{local_addr}");

		let (tx, rx) = oneshot::channel::<()>();
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.local_addr = Some(local_addr);
		self.exit_signal = Some(tx);
		self.join = Some(handle);

		Ok(())
	}

	/// Signals graceful shutdown and waits up to 10 seconds for in-flight requests.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");

		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}

		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(Duration::from_secs(10), handle).await {
				Ok(Err(err)) => log::warn!("server task join error: {err}"),
				Ok(Ok(())) => {}
				Err(_) => log::warn!("server task did not shut down within timeout; continuing"),
			}
		}

		self.local_addr = None;
	}

	/// Address the running server is bound to. Useful with port 0.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.local_addr
	}

	pub fn is_running(&self) -> bool {
		self.join.is_some()
	}
}

/// Wraps the whole `router` in one protection stack, so the limits are global and not per route.
///
/// Outermost first: HandleError, CatchPanic, Timeout, LoadShed, Buffer, ConcurrencyLimit. Up to
/// `concurrency_limit` requests run at once and twice as many wait in the buffer. Once the buffer
/// is full, further requests are shed. Shed and timed out requests get `503` with `Retry-After`.
fn protect(router: Router, request_timeout: Duration, concurrency_limit: usize) -> Router {
	let overload_handler = HandleErrorLayer::new(|err: BoxError| async move {
		log::warn!("rejecting request: {err}");
		let mut response = (StatusCode::SERVICE_UNAVAILABLE, "Service overloaded, try later").into_response();
		response
			.headers_mut()
			.insert(header::RETRY_AFTER, HeaderValue::from_static("2"));
		Ok::<_, std::convert::Infallible>(response)
	});

	let protected = ServiceBuilder::new()
		.layer(overload_handler)
		.layer(CatchPanicLayer::new())
		.layer(TimeoutLayer::new(request_timeout))
		.layer(LoadShedLayer::new())
		.layer(BufferLayer::new(concurrency_limit * 2))
		.layer(ConcurrencyLimitLayer::new(concurrency_limit))
		.service(router);

	Router::new().fallback_service(protected)
}

/// These spin up a real TCP listener on an ephemeral localhost port.
#[cfg(test)]
mod tests {
	use super::*;
	use crate::server::testing::geotiff_rgb_4326;
	use futures::future::join_all;
	use gridprobe_image::fixtures::{encoded, gradient_rgb};
	use image::{GenericImageView, ImageFormat};
	use reqwest::{
		Client,
		multipart::{Form, Part},
	};
	use serde_json::Value;

	const CONFIG: &str = r#"
server:
  ip: 127.0.0.1
  port: 0
cors:
  allowed_origins: ["https://maps.example.org"]
extra_response_headers:
  Cache-Control: no-store
"#;

	async fn started() -> (ProbeServer, String) {
		let mut server = ProbeServer::from_config(&Config::from_string(CONFIG).unwrap()).unwrap();
		server.start().await.unwrap();
		let base = format!("http://{}", server.local_addr().unwrap());
		(server, base)
	}

	fn file_form(field: &str, file_name: &str, bytes: Vec<u8>) -> Form {
		Form::new().part(field.to_string(), Part::bytes(bytes).file_name(file_name.to_string()))
	}

	#[tokio::test]
	async fn status_and_lifecycle() {
		let (mut server, base) = started().await;
		assert!(server.is_running());

		let response = reqwest::get(format!("{base}/status")).await.unwrap();
		assert_eq!(response.status(), 200);
		assert_eq!(response.headers()["cache-control"], "no-store");
		assert_eq!(response.text().await.unwrap(), "ready!");

		// restarting binds a fresh listener
		server.start().await.unwrap();
		let base = format!("http://{}", server.local_addr().unwrap());
		assert_eq!(reqwest::get(format!("{base}/status")).await.unwrap().status(), 200);

		server.stop().await;
		assert!(!server.is_running());
		assert_eq!(server.local_addr(), None);
		server.stop().await;
		assert!(reqwest::get(format!("{base}/status")).await.is_err());
	}

	#[tokio::test]
	async fn attributes_over_http() {
		let (mut server, base) = started().await;
		let response = Client::new()
			.post(format!("{base}/attributes"))
			.header("origin", "https://maps.example.org")
			.multipart(file_form("image_file", "world.tif", geotiff_rgb_4326(256, 256)))
			.send()
			.await
			.unwrap();
		assert_eq!(response.status(), 200);
		assert_eq!(
			response.headers()["access-control-allow-origin"],
			"https://maps.example.org"
		);
		let json: Value = response.json().await.unwrap();
		assert_eq!(json["width"], 256);
		assert_eq!(json["crs"]["init"], "epsg:4326");
		server.stop().await;
	}

	#[tokio::test]
	async fn errors_are_json_with_extra_headers() {
		let (mut server, base) = started().await;
		let response = Client::new()
			.post(format!("{base}/thumbnail?resolution=-1"))
			.multipart(file_form("image", "a.png", vec![1, 2, 3]))
			.send()
			.await
			.unwrap();
		assert_eq!(response.status(), 400);
		assert_eq!(response.headers()["cache-control"], "no-store");
		let json: Value = response.json().await.unwrap();
		assert!(json["error"].as_str().unwrap().contains("resolution"));
		server.stop().await;
	}

	#[tokio::test]
	async fn concurrent_uploads_are_independent() {
		let (mut server, base) = started().await;
		let client = Client::new();

		let requests = (1..=8u32).map(|i| {
			let client = client.clone();
			let url = format!("{base}/thumbnail?resolution={}", i * 8);
			let bytes = encoded(&gradient_rgb(10 + i, 20 + i), ImageFormat::Png);
			async move {
				let response = client
					.post(url)
					.multipart(file_form("image", "a.png", bytes))
					.send()
					.await
					.unwrap();
				assert_eq!(response.status(), 200);
				assert_eq!(response.headers()["content-type"], "image/png");
				let body = response.bytes().await.unwrap();
				(i, image::load_from_memory(&body).unwrap().dimensions())
			}
		});

		for (i, dimensions) in join_all(requests).await {
			assert_eq!(dimensions, (i * 8, i * 8));
		}
		server.stop().await;
	}

	#[tokio::test]
	async fn concurrent_attribute_requests_are_independent() {
		let (mut server, base) = started().await;
		let client = Client::new();

		let requests = (1..=8u32).map(|i| {
			let client = client.clone();
			let url = format!("{base}/attributes");
			let bytes = geotiff_rgb_4326(16 * i, 8 + i);
			async move {
				let response = client
					.post(url)
					.multipart(file_form("image_file", "a.tif", bytes))
					.send()
					.await
					.unwrap();
				assert_eq!(response.status(), 200);
				(i, response.json::<Value>().await.unwrap())
			}
		});

		for (i, json) in join_all(requests).await {
			assert_eq!(json["width"], 16 * i);
			assert_eq!(json["height"], 8 + i);
			assert_eq!(json["bbox"][2], -10.0 + 0.5 * f64::from(16 * i));
		}
		server.stop().await;
	}

	fn slow_router(delay: Duration) -> Router {
		Router::new().route(
			"/",
			axum::routing::get(move || async move {
				tokio::time::sleep(delay).await;
				"done"
			}),
		)
	}

	fn root_request() -> axum::http::Request<axum::body::Body> {
		axum::http::Request::builder()
			.uri("/")
			.body(axum::body::Body::empty())
			.unwrap()
	}

	#[tokio::test]
	async fn saturated_stack_sheds_load() {
		use tower::ServiceExt;

		let app = protect(slow_router(Duration::from_millis(300)), Duration::from_secs(10), 1);
		let responses = join_all((0..8).map(|_| app.clone().oneshot(root_request()))).await;
		let statuses: Vec<StatusCode> = responses.iter().map(|r| r.as_ref().unwrap().status()).collect();

		assert!(statuses.contains(&StatusCode::OK), "{statuses:?}");
		assert!(statuses.contains(&StatusCode::SERVICE_UNAVAILABLE), "{statuses:?}");
		for response in responses.iter().map(|r| r.as_ref().unwrap()) {
			if response.status() == StatusCode::SERVICE_UNAVAILABLE {
				assert_eq!(response.headers()[header::RETRY_AFTER], "2");
			}
		}
	}

	#[tokio::test]
	async fn slow_requests_time_out() {
		use tower::ServiceExt;

		let app = protect(slow_router(Duration::from_secs(5)), Duration::from_millis(50), 4);
		let response = app.oneshot(root_request()).await.unwrap();
		assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(response.headers()[header::RETRY_AFTER], "2");
	}

	#[test]
	fn invalid_extra_headers() {
		let config = Config::from_string("extra_response_headers:\n  \"bad header\": x\n").unwrap();
		let err = ProbeServer::from_config(&config).unwrap_err();
		assert!(err.to_string().contains("bad header"), "{err}");

		let config = Config::from_string("extra_response_headers:\n  X-Test: \"a\\nb\"\n").unwrap();
		assert!(ProbeServer::from_config(&config).is_err());
	}

	#[test]
	fn invalid_origin_pattern() {
		let mut config = Config::default();
		config.cors.allowed_origins = vec!["/(unclosed/".to_string()];
		let err = ProbeServer::from_config(&config).unwrap_err();
		assert!(err.to_string().contains("invalid CORS origin regex"), "{err}");
	}

	#[tokio::test]
	async fn bind_failure() {
		let (mut first, base) = started().await;
		let port = first.local_addr().unwrap().port();
		let config = Config::from_string(&format!("server:\n  port: {port}\n")).unwrap();
		let mut second = ProbeServer::from_config(&config).unwrap();
		let err = second.start().await.unwrap_err();
		assert!(err.to_string().contains("Failed to bind"), "{err}");
		assert!(!second.is_running());
		assert_eq!(reqwest::get(format!("{base}/status")).await.unwrap().status(), 200);
		first.stop().await;
	}
}
