//! Named validator parameters

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigurationError;

/// Insertion-ordered named options handed to a validator unit.
///
/// The typed getters return `Ok(None)` when the key is absent and a
/// [`ConfigurationError::InvalidParameter`] when it is present with the wrong
/// shape; `validator` only labels that error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(IndexMap<String, Value>);

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builds parameters from a JSON object.
    ///
    /// Returns `None` if `value` is not an object.
    #[must_use]
    pub fn from_object(value: &Value) -> Option<Self> {
        value
            .as_object()
            .map(|object| Self(object.iter().map(|(k, v)| (k.clone(), v.clone())).collect()))
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds a parameter, builder style.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Copies every entry of `other` over this set.
    pub fn merge(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    /// Raw access to a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes a parameter, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reads a boolean.
    pub fn bool(&self, validator: &str, key: &str) -> Result<Option<bool>, ConfigurationError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(other) => Err(mismatch(validator, key, "a boolean", other)),
        }
    }

    /// Reads a non-negative integer.
    pub fn usize(&self, validator: &str, key: &str) -> Result<Option<usize>, ConfigurationError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| mismatch(validator, key, "a non-negative integer", value)),
        }
    }

    /// Reads a string.
    pub fn str(&self, validator: &str, key: &str) -> Result<Option<&str>, ConfigurationError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(validator, key, "a string", other)),
        }
    }

    /// Reads a list of names, given either as an array of strings or as a
    /// comma-separated string.
    pub fn names(&self, validator: &str, key: &str) -> Result<Option<Vec<String>>, ConfigurationError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned)
                    .collect(),
            )),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| mismatch(validator, key, "a list of strings", item))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(mismatch(validator, key, "a string or a list of strings", other)),
        }
    }

    /// Fails on the first key that is not in `accepted`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidParameter`] naming the unknown key.
    pub fn deny_unknown(&self, validator: &str, accepted: &[&str]) -> Result<(), ConfigurationError> {
        match self.0.keys().find(|key| !accepted.contains(&key.as_str())) {
            Some(key) => Err(ConfigurationError::invalid_parameter(validator, key, "unknown parameter")),
            None => Ok(()),
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn mismatch(validator: &str, key: &str, expected: &str, found: &Value) -> ConfigurationError {
    ConfigurationError::invalid_parameter(validator, key, format!("expected {expected}, found {found}"))
}
