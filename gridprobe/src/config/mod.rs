//! gridprobe server configuration.
//!
//! - [`Config`]: top-level configuration loader and YAML parser
//! - [`ServerConfig`]: network binding and request limits
//! - [`CorsConfig`]: CORS policy
//! - [`ThumbnailConfig`]: thumbnail rendering limits
//!
//! All sections are optional. Missing values fall back to the defaults exposed as constants
//! on each section.

mod cors;
mod main;
mod server;
mod thumbnail;

pub use cors::{CorsConfig, OriginPattern};
pub use main::Config;
pub use server::ServerConfig;
pub use thumbnail::ThumbnailConfig;
