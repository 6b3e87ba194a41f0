//! Regular expression validator

use regex::Regex;
use serde_json::Value;

use super::{ValueRule, is_empty, scalar_text};
use crate::error::{ConfigurationError, ValidationError};
use crate::foundation::Validate;
use crate::registry::AttributeValidator;
use crate::rule::Params;

const ID: &str = "match";
const PARAMS: &[&str] = &["pattern", "not", "allowEmpty"];

/// Requires the value to match (or, inverted, not to match) a pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    invert: bool,
    allow_empty: bool,
}

impl Pattern {
    /// Compiles `pattern`; the value must match it.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            invert: false,
            allow_empty: true,
        })
    }

    /// The value must *not* match.
    #[must_use = "builder methods must be chained or built"]
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Controls whether empty values pass.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// The compiled pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Validate for Pattern {
    type Input = Value;

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        if self.allow_empty && is_empty(input, false) {
            return Ok(());
        }

        let matched = scalar_text(input).is_some_and(|text| self.regex.is_match(&text));
        if matched == self.invert {
            return Err(ValidationError::invalid_format(self.regex.as_str().to_owned())
                .with_param("inverted", self.invert.to_string()));
        }
        Ok(())
    }
}

/// Registry factory for `match`.
pub fn factory(params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> {
    params.deny_unknown(ID, PARAMS)?;
    let source = params
        .str(ID, "pattern")?
        .ok_or_else(|| ConfigurationError::invalid_parameter(ID, "pattern", "missing"))?;
    let validator = Pattern::new(source)
        .map_err(|e| ConfigurationError::invalid_parameter(ID, "pattern", e.to_string()))?
        .inverted(params.bool(ID, "not")?.unwrap_or(false))
        .allow_empty(params.bool(ID, "allowEmpty")?.unwrap_or(true));

    Ok(Box::new(ValueRule::new(validator)))
}
