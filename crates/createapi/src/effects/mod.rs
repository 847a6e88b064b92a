//! I/O: transports, and the compiler that binds descriptors to one.

mod compiler;
mod registry;
mod transport;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(any(target_arch = "wasm32", feature = "reqwest"))]
mod select;
#[cfg(all(not(target_arch = "wasm32"), feature = "reqwest"))]
mod server;

pub use compiler::{ApiCompiler, ErrorFunc, GetApi};
pub use registry::ApiRegistry;
pub use transport::{
    Failure, OnFailure, OnSuccess, Request, ResponseHandle, SharedTransport, Transport,
    TransportKind, TransportOptions,
};

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTransport;
#[cfg(any(target_arch = "wasm32", feature = "reqwest"))]
pub use select::default_transport;
#[cfg(all(not(target_arch = "wasm32"), feature = "reqwest"))]
pub use server::ReqwestTransport;
