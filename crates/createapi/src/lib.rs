//! Generate HTTP GET API clients from declarative descriptors.
//!
//! A [`Descriptor`] names an endpoint URL, parameters filled in when the
//! caller leaves them out, parameters that always override the caller, and
//! a pipeline of [`Transform`]s applied to the response body. An
//! [`ApiCompiler`] turns descriptors into [`GetApi`] callables, one at a time
//! or as a named [`ApiRegistry`].
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Transports
//!
//! Requests go through a [`Transport`], chosen once per process at build
//! time: `fetch` on `wasm32`, a streaming `reqwest` client elsewhere.
//! Any `Arc<dyn Transport>` can be injected instead.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use createapi::{ApiCompiler, Descriptor, Params, Request, Result, ResponseHandle, Transport, TransportKind};
//!
//! /// Answers every request with the same body.
//! struct Canned(&'static str);
//!
//! impl Transport for Canned {
//!     fn kind(&self) -> TransportKind { TransportKind::Custom("canned") }
//!
//!     fn issue_request(&self, request: Request) -> Result<()> {
//!         let handle = ResponseHandle { kind: self.kind(), url: request.url.clone(), status: Some(200) };
//!         request.complete(200, self.0.to_string(), handle);
//!         Ok(())
//!     }
//! }
//!
//! let compiler = ApiCompiler::new(Arc::new(Canned("42")));
//! let answer = compiler.compile_get(
//!     Descriptor::new("/answer")
//!         .transform(createapi::builtin::number())
//!         .required_param("key", "X"),
//!     None,
//! );
//!
//! let seen = Arc::new(Mutex::new(None));
//! let sink = seen.clone();
//! let merged = answer.get(
//!     Params::from([("q", "life")]),
//!     move |value, _raw, _handle| *sink.lock().unwrap() = Some(value),
//!     |_, _, _| {},
//! );
//!
//! assert_eq!(merged, Params::from([("q", "life"), ("key", "X")]));
//! assert_eq!(*seen.lock().unwrap(), Some(serde_json::json!(42)));
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{Transform, TransformError, apply_transforms, build_query, build_url, builtin, merge_params};
pub use self::data::{ApiConfig, Descriptor, DescriptorSpec, Params, TransformNames};
pub use self::effects::{
    ApiCompiler, ApiRegistry, ErrorFunc, Failure, GetApi, OnFailure, OnSuccess, Request,
    ResponseHandle, SharedTransport, Transport, TransportKind, TransportOptions,
};

#[cfg(target_arch = "wasm32")]
pub use self::effects::BrowserTransport;
#[cfg(any(target_arch = "wasm32", feature = "reqwest"))]
pub use self::effects::default_transport;
#[cfg(all(not(target_arch = "wasm32"), feature = "reqwest"))]
pub use self::effects::ReqwestTransport;

pub use self::error::{Error, Result};
