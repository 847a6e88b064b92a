//! Error types for createapi.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("no async runtime available to issue the request")]
    NoRuntime,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("unknown transform: {0}")]
    UnknownTransform(String),

    #[error("invalid API configuration: {0}")]
    Config(String),
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self { Error::InvalidUrl(e.to_string()) }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self { Error::Config(e.to_string()) }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self { Error::Config(e.to_string()) }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "reqwest"))]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self { Error::Http(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, Error>;
