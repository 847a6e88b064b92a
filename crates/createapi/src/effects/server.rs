//! Server-style transport: streaming GET over `reqwest` on the ambient tokio runtime.

use bytes::BytesMut;
use futures_util::StreamExt;
use tokio::runtime::Handle;

use super::transport::{
    Failure, Request, ResponseHandle, Transport, TransportKind, TransportOptions,
};
use crate::error::{Error, Result};

/// Production transport for non-browser targets.
///
/// Body chunks are accumulated as they arrive; at end of stream the
/// pipeline runs and the success callback fires. A send or stream error
/// fires the failure callback with whatever body arrived before it. The
/// status code is not inspected; it is reported in the [`ResponseHandle`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client:  reqwest::Client,
    options: TransportOptions,
}

impl ReqwestTransport {
    /// Create a new transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> { Self::with_options(TransportOptions::default()) }

    /// Create a transport that resolves URLs and sets headers per `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the client cannot be built, e.g. when the
    /// user agent is not a valid header value.
    pub fn with_options(options: TransportOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ref user_agent) = options.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Ok(Self {
            client: builder.build()?,
            options,
        })
    }

    /// Reuse an existing client, e.g. one shared with the rest of an application.
    pub fn from_client(client: reqwest::Client, options: TransportOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &TransportOptions { &self.options }
}

impl Transport for ReqwestTransport {
    fn kind(&self) -> TransportKind { TransportKind::Server }

    fn issue_request(&self, request: Request) -> Result<()> {
        let url = self.options.resolve(&request.url)?;
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let client = self.client.clone();

        tracing::debug!(url = %url, "issuing GET");
        runtime.spawn(async move {
            let mut handle = ResponseHandle {
                kind:   TransportKind::Server,
                url:    request.url.clone(),
                status: None,
            };

            let response = match client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    request.fail(Failure::Error(e.into()), String::new(), handle);
                    return;
                }
            };
            handle.status = Some(response.status().as_u16());

            let mut body = BytesMut::new();
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(chunk) => {
                        tracing::trace!(len = chunk.len(), "received chunk");
                        body.extend_from_slice(&chunk);
                    }
                    Err(e) => {
                        let partial = String::from_utf8_lossy(&body).into_owned();
                        request.fail(Failure::Error(e.into()), partial, handle);
                        return;
                    }
                }
            }

            let body = String::from_utf8_lossy(&body).into_owned();
            request.succeed(body, handle);
        });
        Ok(())
    }
}
