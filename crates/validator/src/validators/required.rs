//! Presence validator

use serde_json::Value;

use super::{ValueRule, is_empty};
use crate::error::{ConfigurationError, ValidationError};
use crate::registry::AttributeValidator;
use crate::rule::Params;

const ID: &str = "required";
const PARAMS: &[&str] = &["requiredValue", "trim"];

crate::validator! {
    /// Fails on `null`, empty strings (whitespace-only when `trim` is set),
    /// empty arrays and objects.
    ///
    /// With a `required_value` the input must equal it exactly instead.
    #[derive(PartialEq)]
    pub Required { required_value: Option<Value>, trim: bool } for Value;
    rule(self, input) {
        match &self.required_value {
            Some(expected) => input == expected,
            None => !is_empty(input, self.trim),
        }
    }
    error(self, input) {
        match &self.required_value {
            Some(expected) => ValidationError::new("required_value", format!("Must be {expected}"))
                .with_param("requiredValue", expected.to_string()),
            None => ValidationError::required(),
        }
    }
    fn required(required_value: Option<Value>, trim: bool);
}

/// Registry factory for `required`.
pub fn factory(params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> {
    params.deny_unknown(ID, PARAMS)?;
    let validator = required(
        params.get("requiredValue").cloned(),
        params.bool(ID, "trim")?.unwrap_or(true),
    );
    Ok(Box::new(ValueRule::new(validator)))
}
