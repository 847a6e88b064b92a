//! Pure transformations: the response pipeline and parameter merging.
//!
//! Nothing in this module performs I/O.

mod params;
pub mod transform;

pub use params::{build_query, build_url, merge_params};
pub use transform::{apply_transforms, builtin, Transform, TransformError};
