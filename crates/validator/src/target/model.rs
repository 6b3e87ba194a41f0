//! A ready-made target backed by JSON values

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AttributeErrors, ValidationTarget};

/// Attribute bag with an error collection.
///
/// # Examples
///
/// ```rust
/// use precond_validator::target::{Model, ValidationTarget};
/// use serde_json::json;
///
/// let model = Model::new()
///     .with_attribute("role", json!("admin"))
///     .with_scenario("create");
///
/// assert_eq!(model.attribute("role"), Some(&json!("admin")));
/// assert_eq!(model.scenario(), Some("create"));
/// assert!(!model.has_errors());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    attributes: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip)]
    errors: AttributeErrors,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from a JSON object's members.
    ///
    /// Returns `None` if `value` is not an object.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            attributes: object.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            ..Self::default()
        })
    }

    /// Sets an attribute, builder style.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets the scenario, builder style.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }

    /// Sets an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Changes the scenario.
    pub fn set_scenario(&mut self, scenario: Option<String>) {
        self.scenario = scenario;
    }

    /// Iterates attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl ValidationTarget for Model {
    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    fn errors(&self) -> &AttributeErrors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut AttributeErrors {
        &mut self.errors
    }
}
