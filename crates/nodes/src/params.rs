//! Parameter access for a single item.
//!
//! The host owns parameter resolution (expressions, defaults declared in the
//! UI layer). Nodes only see the [`ParameterAccessor`] capability, plus the
//! conditional-insertion helpers used to assemble request bodies and queries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::NodeError;

/// Read access to the parameters of one item.
///
/// A `null` value is treated exactly like an absent one.
pub trait ParameterAccessor: Send + Sync {
    /// Raw lookup of a parameter by name.
    fn lookup(&self, name: &str) -> Option<Value>;

    /// Fetch a parameter that must be present.
    fn required(&self, name: &str) -> Result<Value, NodeError> {
        present(self.lookup(name)).ok_or_else(|| NodeError::MissingParameter(name.to_owned()))
    }

    /// Fetch a required scalar parameter rendered as a string (for path segments).
    fn required_str(&self, name: &str) -> Result<String, NodeError> {
        let value = self.required(name)?;
        scalar_to_string(&value).ok_or_else(|| NodeError::invalid(name, "expected a scalar value"))
    }

    /// Fetch a parameter, falling back to `default` when absent.
    fn optional(&self, name: &str, default: Value) -> Value {
        present(self.lookup(name)).unwrap_or(default)
    }

    /// Fetch a scalar parameter as a string, falling back to `default` when absent.
    fn optional_str(&self, name: &str, default: &str) -> Result<String, NodeError> {
        match present(self.lookup(name)) {
            None => Ok(default.to_owned()),
            Some(value) => scalar_to_string(&value)
                .ok_or_else(|| NodeError::invalid(name, "expected a scalar value")),
        }
    }

    /// Fetch an option collection; absent collections are empty.
    fn collection(&self, name: &str) -> Result<Map<String, Value>, NodeError> {
        match present(self.lookup(name)) {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(NodeError::invalid(name, "expected an object")),
        }
    }
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

// ---------------------------------------------------------------------------
// ParameterBag
// ---------------------------------------------------------------------------

/// A JSON-object-backed parameter accessor, one per item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBag(Map<String, Value>);

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, NodeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NodeError::invalid(
                "parameters",
                format!("expected a JSON object, got {other}"),
            )),
        }
    }

    /// Builder-style insert, handy in tests and the CLI.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }
}

impl ParameterAccessor for ParameterBag {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.0.get(name).cloned()
    }
}

// ---------------------------------------------------------------------------
// Conditional insertion
// ---------------------------------------------------------------------------

/// When an optional field makes it into a body or query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Only non-empty, non-zero, non-false values.
    Truthy,
    /// Any present, non-null value (including `false` and `0`).
    Defined,
}

impl Inclusion {
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Self::Truthy => is_truthy(value),
            Self::Defined => !value.is_null(),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a scalar as a string; arrays and objects yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Copy `key` from `source` into `target` under the same name if admitted.
pub fn include_if(
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    key: &str,
    inclusion: Inclusion,
) {
    include_as(target, key, source, key, inclusion);
}

/// Copy `source_key` from `source` into `target` as `target_key` if admitted.
pub fn include_as(
    target: &mut Map<String, Value>,
    target_key: &str,
    source: &Map<String, Value>,
    source_key: &str,
    inclusion: Inclusion,
) {
    if let Some(value) = source.get(source_key) {
        insert_if(target, target_key, value.clone(), inclusion);
    }
}

/// Copy parameter `name` into `target` as `target_key` if present and admitted.
pub fn include_param(
    target: &mut Map<String, Value>,
    target_key: &str,
    params: &dyn ParameterAccessor,
    name: &str,
    inclusion: Inclusion,
) {
    if let Some(value) = params.lookup(name) {
        insert_if(target, target_key, value, inclusion);
    }
}

/// Insert `value` under `key` if admitted.
pub fn insert_if(target: &mut Map<String, Value>, key: &str, value: Value, inclusion: Inclusion) {
    if inclusion.admits(&value) {
        target.insert(key.to_owned(), value);
    }
}
