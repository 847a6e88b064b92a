use crate::core::Transform;

use super::Params;

/// Declarative description of one GET endpoint.
///
/// # Examples
///
/// ```
/// use createapi::{Descriptor, builtin};
///
/// let descriptor = Descriptor::new("https://api.example.com/search")
///     .transform(builtin::json())
///     .default_param("limit", "10")
///     .required_param("key", "X");
///
/// assert_eq!(descriptor.url, "https://api.example.com/search");
/// assert_eq!(descriptor.data_required.get("key"), Some("X"));
/// ```
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Endpoint URL. `"/?<query>"` is appended on every call.
    ///
    /// Default: `"/"`
    pub url: String,

    /// Transforms applied in order to the response body.
    ///
    /// Default: empty
    pub transform_response: Vec<Transform>,

    /// Values used when the caller omits a key or leaves it empty.
    ///
    /// Default: empty
    pub data_default: Params,

    /// Values that always override the caller's input.
    ///
    /// Default: empty
    pub data_required: Params,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self {
            url:                "/".to_string(),
            transform_response: Vec::new(),
            data_default:       Params::new(),
            data_required:      Params::new(),
        }
    }
}

impl Descriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Append one transform to the response pipeline.
    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform_response.push(transform);
        self
    }

    /// Replace the response pipeline.
    #[must_use]
    pub fn transforms(mut self, transforms: impl IntoIterator<Item = Transform>) -> Self {
        self.transform_response = transforms.into_iter().collect();
        self
    }

    /// Add a default, used when the caller leaves `key` absent or empty.
    #[must_use]
    pub fn default_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_default.insert(key, value);
        self
    }

    /// Add a required value, which always overwrites the caller's.
    #[must_use]
    pub fn required_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_required.insert(key, value);
        self
    }

    /// Replace all defaults.
    #[must_use]
    pub fn data_default(mut self, params: Params) -> Self {
        self.data_default = params;
        self
    }

    /// Replace all required values.
    #[must_use]
    pub fn data_required(mut self, params: Params) -> Self {
        self.data_required = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        let d = Descriptor::default();
        assert_eq!(d.url, "/");
        assert!(d.transform_response.is_empty());
        assert!(d.data_default.is_empty());
        assert!(d.data_required.is_empty());
    }

    #[test]
    fn test_single_transform_is_one_element_pipeline() {
        let d = Descriptor::new("/n").transform(crate::core::builtin::number());
        assert_eq!(d.transform_response.len(), 1);
        assert_eq!(d.transform_response[0].name(), "number");
    }
}
