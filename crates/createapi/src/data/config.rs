//! Descriptor sets loaded from TOML or JSON.
//!
//! ```toml
//! [apis.integers]
//! url = "https://www.random.org/integers"
//! transform_response = ["lines", "numbers"]
//!
//! [apis.integers.data_default]
//! num = "10"
//!
//! [apis.integers.data_required]
//! format = "plain"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Descriptor, Params};
use crate::core::Transform;
use crate::error::{Error, Result};

/// Serializable form of a [`Descriptor`]. Transforms are named built-ins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DescriptorSpec {
    pub url:                Option<String>,
    pub transform_response: TransformNames,
    pub data_default:       Params,
    pub data_required:      Params,
}

/// One transform name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformNames {
    One(String),
    Many(Vec<String>),
}

impl Default for TransformNames {
    fn default() -> Self { TransformNames::Many(Vec::new()) }
}

impl TransformNames {
    pub fn as_slice(&self) -> &[String] {
        match self {
            TransformNames::One(name) => std::slice::from_ref(name),
            TransformNames::Many(names) => names,
        }
    }
}

impl DescriptorSpec {
    pub fn to_descriptor(&self) -> Result<Descriptor> {
        let transforms = self
            .transform_response
            .as_slice()
            .iter()
            .map(|name| Transform::by_name(name).ok_or_else(|| Error::UnknownTransform(name.clone())))
            .collect::<Result<Vec<_>>>()?;

        let mut descriptor = match &self.url {
            Some(url) if !url.is_empty() => Descriptor::new(url.clone()),
            _ => Descriptor::default(),
        };
        descriptor.transform_response = transforms;
        descriptor.data_default = self.data_default.clone();
        descriptor.data_required = self.data_required.clone();
        Ok(descriptor)
    }
}

/// A named set of descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default)]
    pub apis: BTreeMap<String, DescriptorSpec>,
}

impl ApiConfig {
    /// Parse a TOML document with one table per endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed TOML or unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self> { Ok(toml::from_str(s)?) }

    /// Parse a JSON object with one member per endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed JSON or unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self> { Ok(serde_json::from_str(s)?) }

    /// Resolve every spec, failing on the first unknown transform name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTransform`] naming the offending transform.
    pub fn to_descriptors(&self) -> Result<Vec<(String, Descriptor)>> {
        self.apis
            .iter()
            .map(|(name, spec)| Ok((name.clone(), spec.to_descriptor()?)))
            .collect()
    }
}
