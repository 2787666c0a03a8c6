//! Image decoding and thumbnail rendering for gridprobe.

mod format;
mod thumbnail;
pub mod traits;

#[cfg(any(test, feature = "test"))]
pub mod fixtures;

pub use format::*;
pub use thumbnail::*;
pub use traits::*;
