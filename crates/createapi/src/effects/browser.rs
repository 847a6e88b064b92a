//! Browser-style transport: `fetch` on the global scope of a window or worker.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{self, Promise};
use web_sys::{RequestInit, RequestMode, Response, Window, WorkerGlobalScope};

use super::transport::{
    Failure, Request, ResponseHandle, Transport, TransportKind, TransportOptions,
};
use crate::error::{Error, Result};

/// Transport selected on `wasm32`.
///
/// Once the response has been read, a status below 400 runs the pipeline
/// and fires the success callback; any other status fires the failure
/// callback with [`Failure::Status`]. A rejected fetch is delivered as
/// [`Failure::Error`].
#[derive(Debug, Clone, Default)]
pub struct BrowserTransport {
    options: TransportOptions,
}

impl BrowserTransport {
    pub fn new() -> Self { Self::default() }

    /// Create a transport that resolves relative URLs per `options`.
    pub fn with_options(options: TransportOptions) -> Self { Self { options } }
}

fn js_error(e: JsValue) -> Error { Error::Http(format!("{e:?}")) }

fn global_fetch(request: &web_sys::Request) -> Result<Promise> {
    let global = js_sys::global();
    if let Some(window) = global.dyn_ref::<Window>() {
        return Ok(window.fetch_with_request(request));
    }
    if let Some(scope) = global.dyn_ref::<WorkerGlobalScope>() {
        return Ok(scope.fetch_with_request(request));
    }
    Err(Error::Http("global scope has no fetch".to_string()))
}

async fn read_response(promise: Promise) -> std::result::Result<(u16, String), (Error, Option<u16>)> {
    let value = JsFuture::from(promise).await.map_err(|e| (js_error(e), None))?;
    let response: Response = value.dyn_into().map_err(|e| (js_error(e), None))?;
    let status = response.status();
    let text = response.text().map_err(|e| (js_error(e), Some(status)))?;
    let body = JsFuture::from(text).await.map_err(|e| (js_error(e), Some(status)))?;
    Ok((status, body.as_string().unwrap_or_default()))
}

impl Transport for BrowserTransport {
    fn kind(&self) -> TransportKind { TransportKind::Browser }

    fn issue_request(&self, request: Request) -> Result<()> {
        let url = match self.options.base_url {
            Some(_) => self.options.resolve(&request.url)?.to_string(),
            None => request.url.clone(),
        };

        let init = RequestInit::new();
        init.set_method("GET");
        init.set_mode(RequestMode::Cors);
        let js_request = web_sys::Request::new_with_str_and_init(&url, &init)
            .map_err(|e| Error::InvalidUrl(format!("{url}: {e:?}")))?;
        let promise = global_fetch(&js_request)?;

        tracing::debug!(url = %url, "issuing GET");
        wasm_bindgen_futures::spawn_local(async move {
            let mut handle = ResponseHandle {
                kind:   TransportKind::Browser,
                url:    request.url.clone(),
                status: None,
            };
            match read_response(promise).await {
                Ok((status, body)) => {
                    handle.status = Some(status);
                    request.complete(status, body, handle);
                }
                Err((e, status)) => {
                    handle.status = status;
                    request.fail(Failure::Error(e), String::new(), handle);
                }
            }
        });
        Ok(())
    }
}
