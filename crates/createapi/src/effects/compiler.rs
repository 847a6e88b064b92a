use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::registry::ApiRegistry;
use super::transport::{Failure, OnFailure, OnSuccess, Request, ResponseHandle, SharedTransport};
use crate::core::{Transform, build_url, merge_params};
use crate::data::{ApiConfig, Descriptor, Params};
use crate::error::{Error, Result};

/// Receives errors raised while building or dispatching a request.
pub type ErrorFunc = Arc<dyn Fn(Error) + Send + Sync>;

/// Compiles descriptors into callables bound to one transport.
///
/// # Examples
///
/// ```no_run
/// use createapi::{ApiCompiler, Descriptor, Params, builtin};
///
/// # async fn run() -> createapi::Result<()> {
/// let compiler = ApiCompiler::with_default_transport()?;
/// let integers = compiler.compile_get(
///     Descriptor::new("https://www.random.org/integers")
///         .transforms([builtin::lines(), builtin::numbers()])
///         .default_param("num", "5")
///         .required_param("format", "plain"),
///     None,
/// );
///
/// integers.get(
///     Params::from([("min", "1"), ("max", "6")]),
///     |numbers, _raw, _handle| println!("rolled {numbers}"),
///     |failure, _raw, _handle| eprintln!("failed: {failure}"),
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiCompiler {
    transport: SharedTransport,
}

impl fmt::Debug for ApiCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCompiler")
            .field("transport", &self.transport.kind())
            .finish()
    }
}

impl ApiCompiler {
    pub fn new(transport: SharedTransport) -> Self { Self { transport } }

    /// Bind to the process-wide [`default_transport`](super::default_transport).
    ///
    /// # Errors
    ///
    /// Fails if the default transport cannot be created on first use.
    #[cfg(any(target_arch = "wasm32", feature = "reqwest"))]
    pub fn with_default_transport() -> Result<Self> { Ok(Self::new(super::default_transport()?)) }

    pub fn transport(&self) -> &SharedTransport { &self.transport }

    /// Compile one descriptor.
    pub fn compile_get(&self, descriptor: Descriptor, error_func: Option<ErrorFunc>) -> GetApi {
        let transforms: Arc<[Transform]> = descriptor.transform_response.iter().cloned().collect();
        GetApi {
            descriptor: Arc::new(descriptor),
            transforms,
            transport: self.transport.clone(),
            error_func,
        }
    }

    /// Compile every descriptor into `target` (or a new registry) under the
    /// same name. Entries already in `target` under other names are kept.
    ///
    /// `error_func_by_name` builds the error handler for each name.
    pub fn compile_registry<I, S>(
        &self,
        descriptors: I,
        target: Option<ApiRegistry>,
        error_func_by_name: Option<&dyn Fn(&str) -> ErrorFunc>,
    ) -> ApiRegistry
    where
        I: IntoIterator<Item = (S, Descriptor)>,
        S: Into<String>,
    {
        let mut registry = target.unwrap_or_default();
        for (name, descriptor) in descriptors {
            let name = name.into();
            let error_func = error_func_by_name.map(|factory| factory(&name));
            registry.insert(name, self.compile_get(descriptor, error_func));
        }
        registry
    }

    /// Compile a configuration file's descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTransform`] if a descriptor names a transform
    /// that is not built in. Nothing is compiled in that case.
    pub fn compile_config(
        &self,
        config: &ApiConfig,
        target: Option<ApiRegistry>,
        error_func_by_name: Option<&dyn Fn(&str) -> ErrorFunc>,
    ) -> Result<ApiRegistry> {
        Ok(self.compile_registry(config.to_descriptors()?, target, error_func_by_name))
    }
}

/// A compiled GET endpoint.
#[derive(Clone)]
pub struct GetApi {
    descriptor: Arc<Descriptor>,
    transforms: Arc<[Transform]>,
    transport:  SharedTransport,
    error_func: Option<ErrorFunc>,
}

impl fmt::Debug for GetApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetApi")
            .field("descriptor", &self.descriptor)
            .field("transport", &self.transport.kind())
            .field("error_func", &self.error_func.is_some())
            .finish()
    }
}

impl GetApi {
    pub fn descriptor(&self) -> &Descriptor { &self.descriptor }

    /// The URL a call with `params` would request, and the merged params.
    pub fn prepare(&self, params: Option<Params>) -> (String, Params) {
        let merged = merge_params(
            params.unwrap_or_default(),
            &self.descriptor.data_default,
            &self.descriptor.data_required,
        );
        (build_url(&self.descriptor.url, &merged), merged)
    }

    /// Issue the request and return the merged parameters.
    ///
    /// The outcome arrives later through `on_success` or `on_failure`. If the
    /// request cannot be issued, the error goes to the compile-time error
    /// handler, or is dropped when there is none. This never panics.
    pub fn call(
        &self,
        params: Option<Params>,
        on_success: Option<OnSuccess>,
        on_failure: Option<OnFailure>,
    ) -> Params {
        let (url, merged) = self.prepare(params);
        let request = Request {
            url,
            on_success,
            on_failure,
            transforms: self.transforms.clone(),
        };

        if let Err(e) = self.transport.issue_request(request) {
            match &self.error_func {
                Some(error_func) => error_func(e),
                None => tracing::debug!(error = %e, "request not issued, no error handler"),
            }
        }
        merged
    }

    /// [`GetApi::call`] with both callbacks given as closures.
    pub fn get<S, F>(&self, params: Params, on_success: S, on_failure: F) -> Params
    where
        S: FnOnce(Value, String, ResponseHandle) + Send + 'static,
        F: FnOnce(Failure, String, ResponseHandle) + Send + 'static,
    {
        self.call(Some(params), Some(Box::new(on_success)), Some(Box::new(on_failure)))
    }
}
