//! String length validator
//!
//! Length is measured in Unicode scalar values (chars). Numbers are measured
//! by their decimal text.

use serde_json::Value;

use super::{ValueRule, is_empty, scalar_text};
use crate::error::{ConfigurationError, ValidationError};
use crate::foundation::Validate;
use crate::registry::AttributeValidator;
use crate::rule::Params;

const ID: &str = "length";
const PARAMS: &[&str] = &["min", "max", "is", "allowEmpty"];

/// Checks `min`, `max` and exact (`is`) length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Length {
    /// Minimum length, inclusive.
    pub min: Option<usize>,
    /// Maximum length, inclusive.
    pub max: Option<usize>,
    /// Exact length.
    pub exact: Option<usize>,
    /// Empty values pass without measuring.
    pub allow_empty: bool,
}

impl Length {
    /// A validator with no bounds that lets empty values through.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min: None,
            max: None,
            exact: None,
            allow_empty: true,
        }
    }

    /// Sets the minimum.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the maximum.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the exact length.
    #[must_use = "builder methods must be chained or built"]
    pub fn exactly(mut self, length: usize) -> Self {
        self.exact = Some(length);
        self
    }

    /// Controls whether empty values pass.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::new()
    }
}

impl Validate for Length {
    type Input = Value;

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        if self.allow_empty && is_empty(input, false) {
            return Ok(());
        }

        let Some(text) = scalar_text(input) else {
            return Err(ValidationError::new("type_mismatch", "Must be a string")
                .with_param("expected", "string"));
        };
        let actual = text.chars().count();

        if let Some(min) = self.min {
            if actual < min {
                return Err(ValidationError::too_short(min, actual));
            }
        }
        if let Some(max) = self.max {
            if actual > max {
                return Err(ValidationError::too_long(max, actual));
            }
        }
        if let Some(exact) = self.exact {
            if actual != exact {
                return Err(ValidationError::new(
                    "wrong_length",
                    format!("Must be exactly {exact} characters"),
                )
                .with_param("expected", exact.to_string())
                .with_param("actual", actual.to_string()));
            }
        }
        Ok(())
    }
}

/// Registry factory for `length`.
pub fn factory(params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> {
    params.deny_unknown(ID, PARAMS)?;
    let validator = Length {
        min: params.usize(ID, "min")?,
        max: params.usize(ID, "max")?,
        exact: params.usize(ID, "is")?,
        allow_empty: params.bool(ID, "allowEmpty")?.unwrap_or(true),
    };

    if let (Some(min), Some(max)) = (validator.min, validator.max) {
        if min > max {
            return Err(ConfigurationError::invalid_parameter(
                ID,
                "min",
                format!("min ({min}) exceeds max ({max})"),
            ));
        }
    }

    Ok(Box::new(ValueRule::new(validator)))
}
