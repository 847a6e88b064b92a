use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::core::{Transform, apply_transforms};
use crate::error::{Error, Result};

/// Which concrete mechanism carried a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// `fetch` in a browser window or worker.
    Browser,
    /// Streaming `reqwest` client.
    Server,
    /// Anything supplied by the caller, e.g. a test double.
    Custom(&'static str),
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Browser => write!(f, "browser"),
            TransportKind::Server => write!(f, "server"),
            TransportKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Passed as the last argument of both callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHandle {
    pub kind:   TransportKind,
    pub url:    String,
    /// Status code, when the transport saw one.
    pub status: Option<u16>,
}

/// First argument of a failure callback.
#[derive(Debug, Clone)]
pub enum Failure {
    /// The server answered with a status of 400 or above.
    Status(u16),
    /// The request or the body stream failed.
    Error(Error),
}

impl Failure {
    pub fn status(&self) -> Option<u16> {
        match self {
            Failure::Status(status) => Some(*status),
            Failure::Error(_) => None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Status(status) => write!(f, "HTTP status {status}"),
            Failure::Error(e) => write!(f, "{e}"),
        }
    }
}

/// `(transformed, raw_body, handle)`
pub type OnSuccess = Box<dyn FnOnce(Value, String, ResponseHandle) + Send>;

/// `(status_or_error, raw_body, handle)`
pub type OnFailure = Box<dyn FnOnce(Failure, String, ResponseHandle) + Send>;

/// One GET request handed to a [`Transport`].
pub struct Request {
    pub url:        String,
    pub on_success: Option<OnSuccess>,
    pub on_failure: Option<OnFailure>,
    pub transforms: Arc<[Transform]>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .field("transforms", &self.transforms)
            .finish()
    }
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url:        url.into(),
            on_success: None,
            on_failure: None,
            transforms: Arc::from([]),
        }
    }

    #[must_use]
    pub fn on_success(mut self, f: impl FnOnce(Value, String, ResponseHandle) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_failure(mut self, f: impl FnOnce(Failure, String, ResponseHandle) + Send + 'static) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn transforms(mut self, transforms: Arc<[Transform]>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Run the pipeline over `body` and hand the result to the success callback.
    pub fn succeed(self, body: String, handle: ResponseHandle) {
        if let Some(on_success) = self.on_success {
            let transformed = apply_transforms(Value::String(body.clone()), &self.transforms);
            on_success(transformed, body, handle);
        }
    }

    /// Hand `failure` to the failure callback; the pipeline does not run.
    pub fn fail(self, failure: Failure, body: String, handle: ResponseHandle) {
        if let Some(on_failure) = self.on_failure {
            on_failure(failure, body, handle);
        }
    }

    /// Browser-style completion: below 400 succeeds, anything else fails.
    pub fn complete(self, status: u16, body: String, handle: ResponseHandle) {
        if status < 400 {
            self.succeed(body, handle);
        } else {
            self.fail(Failure::Status(status), body, handle);
        }
    }
}

/// Issues a GET and delivers the body through the request's callbacks.
///
/// `issue_request` returns immediately. Exactly one callback runs later,
/// on the transport's executor. An `Err` means the request was never sent
/// and no callback will run.
///
/// # Implementations
///
/// - [`ReqwestTransport`](super::ReqwestTransport): native, streaming `reqwest`
/// - `BrowserTransport`: `fetch` on `wasm32`
/// - Test doubles injected through [`ApiCompiler::new`](super::ApiCompiler::new)
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    fn issue_request(&self, request: Request) -> Result<()>;
}

pub type SharedTransport = Arc<dyn Transport>;

/// Configuration shared by the built-in transports.
///
/// # Examples
///
/// ```
/// use createapi::TransportOptions;
///
/// let options = TransportOptions::default()
///     .base_url("https://api.example.com")
///     .unwrap()
///     .user_agent("my-app/1.0");
/// assert_eq!(options.user_agent.as_deref(), Some("my-app/1.0"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Base used to resolve relative descriptor URLs such as `/search/?q=x`.
    ///
    /// Browsers resolve against the page location instead.
    ///
    /// Default: None
    pub base_url: Option<Url>,

    /// `User-Agent` header sent by the native transport.
    ///
    /// Default: None
    pub user_agent: Option<String>,
}

impl TransportOptions {
    /// Base URL that relative descriptor URLs are resolved against.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base` is not an absolute URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use createapi::TransportOptions;
    ///
    /// let options = TransportOptions::default().base_url("http://localhost:8080").unwrap();
    /// assert_eq!(options.resolve("/search/?q=1").unwrap().as_str(), "http://localhost:8080/search/?q=1");
    /// assert!(TransportOptions::default().base_url("/relative").is_err());
    /// ```
    pub fn base_url(mut self, base: &str) -> Result<Self> {
        self.base_url = Some(Url::parse(base)?);
        Ok(self)
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve `url` against the configured base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `url` is relative and no base is
    /// configured, or if the result does not parse.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        match &self.base_url {
            Some(base) => base.join(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}"))),
            None => Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}"))),
        }
    }
}
