use std::collections::BTreeMap;

use super::compiler::GetApi;
use super::transport::{OnFailure, OnSuccess};
use crate::data::Params;

/// Compiled endpoints by name. Owned by the caller, populated by
/// [`ApiCompiler::compile_registry`](super::ApiCompiler::compile_registry).
#[derive(Debug, Clone, Default)]
pub struct ApiRegistry {
    apis: BTreeMap<String, GetApi>,
}

impl ApiRegistry {
    pub fn new() -> Self { Self::default() }

    /// Register `api` as `name`, returning the endpoint it replaced.
    pub fn insert(&mut self, name: impl Into<String>, api: GetApi) -> Option<GetApi> {
        self.apis.insert(name.into(), api)
    }

    pub fn get(&self, name: &str) -> Option<&GetApi> { self.apis.get(name) }

    pub fn contains(&self, name: &str) -> bool { self.apis.contains_key(name) }

    pub fn remove(&mut self, name: &str) -> Option<GetApi> { self.apis.remove(name) }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.apis.keys().map(String::as_str) }

    pub fn len(&self) -> usize { self.apis.len() }

    pub fn is_empty(&self) -> bool { self.apis.is_empty() }

    /// Call the endpoint registered as `name`. `None` if there is none.
    pub fn call(
        &self,
        name: &str,
        params: Option<Params>,
        on_success: Option<OnSuccess>,
        on_failure: Option<OnFailure>,
    ) -> Option<Params> {
        self.get(name).map(|api| api.call(params, on_success, on_failure))
    }
}
