//! Extension traits for [`image::DynamicImage`].
//!
//! - [`DynamicImageTraitInfo`]: pixel layout introspection.
//! - [`DynamicImageTraitOperation`]: square resizing and RGB conversion.

mod info;
mod operation;

pub use info::*;
pub use operation::*;
