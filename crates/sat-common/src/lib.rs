//! Common types shared by the satellite compositing and reader crates.
//!
//! The central type is [`DataArray`]: an N-dimensional `f64` array with a
//! label per axis, optional auxiliary coordinates and an ordered attribute
//! mapping. Readers produce them, compositors consume and derive them.

pub mod array;
pub mod attrs;
pub mod dataset;
pub mod error;
pub mod time;

pub use array::DataArray;
pub use attrs::{AttrValue, Attributes};
pub use dataset::Dataset;
pub use error::{CommonError, CommonResult};
pub use time::parse_time_coverage;
