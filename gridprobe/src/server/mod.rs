//! HTTP server: `POST /attributes`, `POST /thumbnail` and `GET /status`.

mod cors;
mod error;
mod handlers;
mod probe_server;
mod routes;
#[cfg(test)]
mod testing;
mod upload;

pub use error::ApiError;
pub use handlers::{ATTRIBUTES_FIELD, AppState, RESOLUTION_FIELD, THUMBNAIL_FIELD};
pub use probe_server::ProbeServer;
pub use routes::build_router;
