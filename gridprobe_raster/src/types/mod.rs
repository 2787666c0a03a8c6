mod attributes;
mod crs;
mod data_type;
mod transform;

pub use attributes::RasterAttributes;
pub use crs::{Crs, CrsValue};
pub use data_type::DataType;
pub use transform::{AffineTransform, BoundingBox};
