//! Immutable data: parameters, descriptors, and their serialized form.

pub mod config;
mod descriptor;
mod params;

pub use config::{ApiConfig, DescriptorSpec, TransformNames};
pub use descriptor::Descriptor;
pub use params::Params;
