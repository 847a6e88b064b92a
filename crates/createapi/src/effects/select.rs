//! Process-wide default transport.
//!
//! The concrete transport is chosen at build time: `fetch` on `wasm32`,
//! `reqwest` everywhere else. It is created on first use and never replaced.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::transport::SharedTransport;
use crate::error::Result;

static DEFAULT_TRANSPORT: OnceCell<SharedTransport> = OnceCell::new();

#[cfg(target_arch = "wasm32")]
fn create_default() -> Result<SharedTransport> { Ok(Arc::new(super::BrowserTransport::new())) }

#[cfg(not(target_arch = "wasm32"))]
fn create_default() -> Result<SharedTransport> { Ok(Arc::new(super::ReqwestTransport::new()?)) }

/// The shared transport for this process.
pub fn default_transport() -> Result<SharedTransport> {
    DEFAULT_TRANSPORT.get_or_try_init(create_default).cloned()
}
