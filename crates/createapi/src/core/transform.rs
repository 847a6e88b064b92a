use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Error raised by a single [`Transform`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transform `{name}` failed: {reason}")]
pub struct TransformError {
    pub name:   String,
    pub reason: String,
}

impl TransformError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name:   name.into(),
            reason: reason.into(),
        }
    }
}

type TransformFn = dyn Fn(&Value) -> Result<Value, TransformError> + Send + Sync;

/// A function applied to a response body.
///
/// The raw body enters the pipeline as [`Value::String`]; each transform
/// may return any JSON value.
#[derive(Clone)]
pub struct Transform {
    name: Arc<str>,
    f:    Arc<TransformFn>,
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).finish()
    }
}

impl Transform {
    /// Wrap an infallible function.
    pub fn new<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f:    Arc::new(move |v| Ok(f(v))),
        }
    }

    /// Wrap a fallible function. A failure leaves the pipeline value unchanged.
    pub fn try_new<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f:    Arc::new(f),
        }
    }

    /// Look up a built-in transform by its configuration name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "number" => Some(builtin::number()),
            "numbers" => Some(builtin::numbers()),
            "json" => Some(builtin::json()),
            "trim" => Some(builtin::trim()),
            "lines" => Some(builtin::lines()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn apply(&self, value: &Value) -> Result<Value, TransformError> { (self.f)(value) }
}

/// Fold `transforms` over `raw`, left to right.
///
/// A transform that fails or panics is skipped: the accumulator keeps its
/// previous value and the fold continues with the next transform.
///
/// # Examples
///
/// ```
/// use createapi::{apply_transforms, Transform};
/// use serde_json::{json, Value};
///
/// let pipeline = [
///     Transform::new("upper", |v: &Value| json!(v.as_str().unwrap_or_default().to_uppercase())),
///     Transform::new("wrap", |v: &Value| json!([v])),
/// ];
///
/// assert_eq!(apply_transforms(json!("abc"), &pipeline), json!(["ABC"]));
/// assert_eq!(apply_transforms(json!("abc"), &[]), json!("abc"));
/// ```
pub fn apply_transforms(raw: Value, transforms: &[Transform]) -> Value {
    transforms.iter().fold(raw, |acc, t| match apply_caught(t, &acc) {
        Ok(next) => next,
        Err(e) => {
            tracing::warn!(transform = t.name(), error = %e, "transform failed, keeping previous value");
            acc
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panicked".to_string())
}

// A panicking transform must not take the response callbacks down with it.
fn apply_caught(t: &Transform, value: &Value) -> Result<Value, TransformError> {
    panic::catch_unwind(AssertUnwindSafe(|| t.apply(value)))
        .unwrap_or_else(|payload| Err(TransformError::new(t.name(), panic_message(payload.as_ref()))))
}

/// Built-in transforms, addressable by name from configuration.
pub mod builtin {
    use serde_json::{Number, Value};

    use super::{Transform, TransformError};

    fn expect_str<'a>(name: &str, value: &'a Value) -> Result<&'a str, TransformError> {
        value
            .as_str()
            .ok_or_else(|| TransformError::new(name, format!("expected a string, got {value}")))
    }

    /// Parse a string with JavaScript `Number()` rules: surrounding
    /// whitespace is ignored and an empty string is zero.
    pub fn parse_number(s: &str) -> Option<Number> {
        let s = s.trim();
        if s.is_empty() {
            return Some(Number::from(0));
        }
        if let Ok(i) = s.parse::<i64>() {
            return Some(Number::from(i));
        }
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(Number::from_f64)
    }

    fn to_number(name: &str, value: &Value) -> Result<Value, TransformError> {
        match value {
            Value::Number(_) => Ok(value.clone()),
            _ => {
                let s = expect_str(name, value)?;
                parse_number(s)
                    .map(Value::Number)
                    .ok_or_else(|| TransformError::new(name, format!("`{s}` is not a number")))
            }
        }
    }

    /// String to number.
    pub fn number() -> Transform { Transform::try_new("number", |v| to_number("number", v)) }

    /// Array of strings to array of numbers.
    pub fn numbers() -> Transform {
        Transform::try_new("numbers", |v| {
            let items = v
                .as_array()
                .ok_or_else(|| TransformError::new("numbers", format!("expected an array, got {v}")))?;
            items
                .iter()
                .map(|item| to_number("numbers", item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        })
    }

    pub fn json() -> Transform {
        Transform::try_new("json", |v| {
            let s = expect_str("json", v)?;
            serde_json::from_str(s).map_err(|e| TransformError::new("json", e.to_string()))
        })
    }

    pub fn trim() -> Transform {
        Transform::try_new("trim", |v| Ok(Value::String(expect_str("trim", v)?.trim().to_string())))
    }

    /// Split into non-empty lines.
    pub fn lines() -> Transform {
        Transform::try_new("lines", |v| {
            let s = expect_str("lines", v)?;
            Ok(Value::Array(
                s.lines()
                    .map(str::trim_end)
                    .filter(|l| !l.is_empty())
                    .map(|l| Value::String(l.to_string()))
                    .collect(),
            ))
        })
    }
}
