//! # gridprobe
//!
//! HTTP service that inspects uploaded raster files and renders PNG thumbnails.
//!
//! - `POST /attributes` answers with width, height, band count, CRS, bounding box, driver,
//!   data type and affine transform as JSON.
//! - `POST /thumbnail` answers with an RGB PNG, stretched to `resolution x resolution` when a
//!   resolution is given.
//! - `GET /status` answers `ready!`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use gridprobe::{Config, server::ProbeServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_string("server:\n  port: 8000\n")?;
//!     let mut server = ProbeServer::from_config(&config)?;
//!     server.start().await?;
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     server.stop().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod server;

pub use config::Config;
pub use gridprobe_image as image;
pub use gridprobe_raster as raster;
