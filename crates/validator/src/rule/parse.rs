//! Array/object notation parser
//!
//! ```text
//! ["role", "required"]                          simple rule
//! ["name", "length", {"min": 3}]                simple rule with parameters
//! [["first", "last"], "required"]               several attributes
//! {"group": [ ... ], "name": "billing"}         group, `name` optional
//! ```

use serde_json::Value;
use tracing::warn;

use super::{AttributeSelector, GroupRule, Params, RuleSpec, SimpleRule, ValidatorId, DEFAULT_GROUP_NAME};
use crate::error::ConfigurationError;

/// How to treat group entries that are not rules (numbers, strings, `null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupMode {
    /// Skip them with a warning.
    #[default]
    Lenient,
    /// Reject the group with [`ConfigurationError::MalformedGroup`].
    Strict,
}

impl RuleSpec {
    /// Parses a specification, skipping non-rule group entries.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        Self::parse(value, GroupMode::Lenient)
    }

    /// Parses a specification with an explicit [`GroupMode`].
    pub fn parse(value: &Value, mode: GroupMode) -> Result<Self, ConfigurationError> {
        match value {
            Value::Array(items) => SimpleRule::from_items(items).map(Self::Simple),
            Value::Object(object) => match object.get("group") {
                Some(children) => {
                    let name = object
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or(DEFAULT_GROUP_NAME);
                    GroupRule::from_children(name, children, mode).map(Self::Group)
                }
                None => Err(ConfigurationError::malformed_rule(
                    "an object rule must contain a 'group' key",
                )),
            },
            other => Err(ConfigurationError::malformed_rule(format!(
                "expected an array rule or a group object, found {}",
                kind(other)
            ))),
        }
    }
}

impl GroupRule {
    fn from_children(name: &str, children: &Value, mode: GroupMode) -> Result<Self, ConfigurationError> {
        let Value::Array(entries) = children else {
            return Err(ConfigurationError::MalformedGroup {
                group: name.to_owned(),
            });
        };

        let mut group = Self::named(name);
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                Value::Array(_) | Value::Object(_) => group.rules.push(RuleSpec::parse(entry, mode)?),
                other => match mode {
                    GroupMode::Lenient => {
                        warn!(group = name, index, kind = kind(other), "skipping non-rule group entry");
                    }
                    GroupMode::Strict => {
                        return Err(ConfigurationError::MalformedGroup {
                            group: name.to_owned(),
                        });
                    }
                },
            }
        }
        Ok(group)
    }
}

impl SimpleRule {
    fn from_items(items: &[Value]) -> Result<Self, ConfigurationError> {
        let [selector, validator, rest @ ..] = items else {
            return Err(ConfigurationError::malformed_rule(
                "a simple rule needs an attribute selector and a validator identifier",
            ));
        };

        let attributes = AttributeSelector::from_value(selector)?;
        let validator = validator_id(validator)?;

        let mut params = Params::new();
        for extra in rest {
            let object = Params::from_object(extra).ok_or_else(|| {
                ConfigurationError::malformed_rule(format!(
                    "parameters of '{validator}' must be objects, found {}",
                    kind(extra)
                ))
            })?;
            params.merge(object);
        }

        Ok(Self {
            attributes,
            validator,
            params,
        })
    }
}

impl AttributeSelector {
    /// Reads a selector from a string (comma notation) or an array of strings.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        let selector = match value {
            Value::String(notation) => Self::parse(notation),
            Value::Array(names) => names
                .iter()
                .map(|name| {
                    name.as_str().map(str::trim).ok_or_else(|| {
                        ConfigurationError::malformed_rule(format!(
                            "attribute names must be strings, found {}",
                            kind(name)
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::many)?,
            other => {
                return Err(ConfigurationError::malformed_rule(format!(
                    "expected an attribute selector, found {}",
                    kind(other)
                )));
            }
        };

        if selector.is_empty() {
            return Err(ConfigurationError::malformed_rule("empty attribute selector"));
        }
        Ok(selector)
    }
}

/// Reads a validator identifier: a non-empty string.
pub(crate) fn validator_id(value: &Value) -> Result<ValidatorId, ConfigurationError> {
    match value.as_str().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(ValidatorId::new(id)),
        _ => Err(ConfigurationError::malformed_rule(format!(
            "expected a validator identifier, found {}",
            kind(value)
        ))),
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
