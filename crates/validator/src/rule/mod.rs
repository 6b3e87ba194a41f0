//! Rule specifications
//!
//! A [`RuleSpec`] is either a [`SimpleRule`] (one validator applied to one or
//! more attributes) or a [`GroupRule`] (an ordered list of nested
//! specifications combined with short-circuit AND).
//!
//! Specifications are usually written in array/object notation and parsed
//! with [`RuleSpec::from_value`]:
//!
//! ```rust
//! use precond_validator::rule::RuleSpec;
//! use serde_json::json;
//!
//! let spec = RuleSpec::from_value(&json!({
//!     "group": [
//!         ["role", "required"],
//!         ["name, email", "length", {"max": 64}],
//!         {"group": [["age", "compare", {"compareValue": 18, "operator": ">="}]]}
//!     ]
//! }))?;
//!
//! assert_eq!(spec.leaf_count(), 3);
//! # Ok::<(), precond_validator::ConfigurationError>(())
//! ```

mod params;
mod parse;

pub use params::Params;
pub use parse::GroupMode;
pub(crate) use parse::{kind, validator_id};

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;

/// Label given to groups that do not declare a `name`.
pub const DEFAULT_GROUP_NAME: &str = "group";

// ============================================================================
// VALIDATOR ID
// ============================================================================

/// Identifier of a validator unit in a [`ValidatorRegistry`](crate::registry::ValidatorRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorId(String);

impl ValidatorId {
    /// Creates a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ValidatorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ValidatorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// ATTRIBUTE SELECTOR
// ============================================================================

/// One attribute name or an ordered list of names.
///
/// Most rules target a single attribute, so the names live inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector(SmallVec<[String; 2]>);

impl AttributeSelector {
    /// Selects a single attribute.
    pub fn single(name: impl Into<String>) -> Self {
        let mut names = SmallVec::new();
        names.push(name.into());
        Self(names)
    }

    /// Selects several attributes, in order.
    pub fn many<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Parses the comma-separated notation: `"first, last"`.
    ///
    /// Blank entries are dropped.
    #[must_use]
    pub fn parse(notation: &str) -> Self {
        Self(
            notation
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// The selected names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of selected attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_value(&self) -> Value {
        match self.0.as_slice() {
            [single] => Value::String(single.clone()),
            names => Value::Array(names.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl From<&str> for AttributeSelector {
    fn from(notation: &str) -> Self {
        Self::parse(notation)
    }
}

// ============================================================================
// SIMPLE RULE
// ============================================================================

/// `(attribute-selector, validator-identifier, parameters...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleRule {
    /// Attributes the validator runs against.
    pub attributes: AttributeSelector,
    /// Registered validator unit to instantiate.
    pub validator: ValidatorId,
    /// Named options handed to the unit.
    pub params: Params,
}

impl SimpleRule {
    /// Creates a rule without parameters.
    pub fn new(attributes: impl Into<AttributeSelector>, validator: impl Into<ValidatorId>) -> Self {
        Self {
            attributes: attributes.into(),
            validator: validator.into(),
            params: Params::new(),
        }
    }

    /// Adds a named parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    fn to_value(&self) -> Value {
        let mut items = vec![
            self.attributes.to_value(),
            Value::String(self.validator.as_str().to_owned()),
        ];
        if !self.params.is_empty() {
            items.push(self.params.to_value());
        }
        Value::Array(items)
    }
}

// ============================================================================
// GROUP RULE
// ============================================================================

/// A named, ordered collection of nested specifications.
///
/// Children are evaluated in insertion order and the first failure wins.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRule {
    /// Label used in diagnostics.
    pub name: String,
    /// Nested specifications, in evaluation order.
    pub rules: Vec<RuleSpec>,
}

impl GroupRule {
    /// Creates an empty group with the default label.
    #[must_use]
    pub fn new() -> Self {
        Self::named(DEFAULT_GROUP_NAME)
    }

    /// Creates an empty group with a label.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Appends a child specification.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, rule: impl Into<RuleSpec>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Returns `true` if the group has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert(
            "group".to_owned(),
            Value::Array(self.rules.iter().map(RuleSpec::to_value).collect()),
        );
        if self.name != DEFAULT_GROUP_NAME {
            object.insert("name".to_owned(), Value::String(self.name.clone()));
        }
        Value::Object(object)
    }
}

impl Default for GroupRule {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RULE SPEC
// ============================================================================

/// A simple rule or a group of rules.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// One validator against one attribute selector.
    Simple(SimpleRule),
    /// Nested specifications combined with short-circuit AND.
    Group(GroupRule),
}

impl RuleSpec {
    /// An empty group, which always passes.
    #[must_use]
    pub fn empty() -> Self {
        Self::Group(GroupRule::new())
    }

    /// Returns `true` for a group without children.
    #[must_use]
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Self::Group(group) if group.is_empty())
    }

    /// Number of simple rules in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Simple(_) => 1,
            Self::Group(group) => group.rules.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Deepest group nesting in the tree. A simple rule has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Simple(_) => 0,
            Self::Group(group) => 1 + group.rules.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// Renders the specification in array/object notation.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Simple(rule) => rule.to_value(),
            Self::Group(group) => group.to_value(),
        }
    }
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<SimpleRule> for RuleSpec {
    fn from(rule: SimpleRule) -> Self {
        Self::Simple(rule)
    }
}

impl From<GroupRule> for RuleSpec {
    fn from(group: GroupRule) -> Self {
        Self::Group(group)
    }
}

impl Serialize for RuleSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
