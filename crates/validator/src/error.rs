//! Error types
//!
//! Two very different things can go wrong while validating:
//!
//! - a **validation failure**: the data does not satisfy a rule. This is not a
//!   Rust error. It is a [`ValidationError`] value recorded on the target's
//!   error collection, or the `false` outcome of a prerequisite check.
//! - a **configuration error**: the rule specification itself is broken
//!   (malformed group, unknown validator, bad parameter). This is a
//!   [`ConfigurationError`], is fatal, and always propagates to the caller.
//!
//! `ValidationError` uses `Cow<'static, str>` so static codes and messages
//! do not allocate.

use std::borrow::Cow;
use std::fmt;

use crate::rule::ValidatorId;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A structured validation failure recorded against an attribute.
///
/// # Examples
///
/// ```rust
/// use precond_validator::ValidationError;
///
/// let error = ValidationError::new("too_short", "Name is too short")
///     .with_field("name")
///     .with_param("min", "3");
///
/// assert_eq!(error.param("min"), Some("3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code for programmatic handling and i18n.
    ///
    /// Examples: "required", "too_short", "compare"
    pub code: Cow<'static, str>,

    /// Human-readable message in English.
    pub message: Cow<'static, str>,

    /// Attribute the error was recorded for, if known.
    pub field: Option<Cow<'static, str>>,

    /// Ordered key-value parameters for message templating.
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            params: Vec::new(),
        }
    }

    /// Sets the attribute this error belongs to.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a template parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| &**v)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", field, self.code, self.message)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

/// Constructors for value-level failures. None of them sets a field; the
/// unit that records the error knows the attribute.
impl ValidationError {
    /// Creates a "required" error.
    pub fn required() -> Self {
        Self::new("required", "This field is required")
    }

    /// Creates a "too_short" error.
    pub fn too_short(min: usize, actual: usize) -> Self {
        Self::new("too_short", format!("Must be at least {min} characters"))
            .with_param("min", min.to_string())
            .with_param("actual", actual.to_string())
    }

    /// Creates a "too_long" error.
    pub fn too_long(max: usize, actual: usize) -> Self {
        Self::new("too_long", format!("Must be at most {max} characters"))
            .with_param("max", max.to_string())
            .with_param("actual", actual.to_string())
    }

    /// Creates an "invalid_format" error.
    pub fn invalid_format(expected: impl Into<Cow<'static, str>>) -> Self {
        Self::new("invalid_format", "Invalid format").with_param("expected", expected)
    }

    /// Creates a "custom" error with a message.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new("custom", message)
    }
}

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// An authoring mistake in a rule specification.
///
/// Never recovered inside the engine: every variant propagates unchanged to
/// the top-level caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A group's children container is not an ordered sequence, or (in
    /// strict mode) contains an entry that is not a rule.
    #[error("group must be an array of rules (group '{group}')")]
    MalformedGroup {
        /// Label of the offending group.
        group: String,
    },

    /// A value could not be read as a rule specification.
    #[error("malformed rule: {reason}")]
    MalformedRule {
        /// What is wrong with the value.
        reason: String,
    },

    /// No factory is registered under the identifier.
    #[error("unknown validator '{id}'")]
    UnknownValidator {
        /// The identifier that was looked up.
        id: ValidatorId,
    },

    /// A validator rejected one of its parameters.
    #[error("invalid parameter '{param}' for validator '{validator}': {reason}")]
    InvalidParameter {
        /// Validator that rejected the parameter.
        validator: String,
        /// Parameter name.
        param: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Group nesting exceeded the evaluator's limit.
    #[error("rule groups nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },
}

impl ConfigurationError {
    /// Creates a `MalformedRule` error.
    pub fn malformed_rule(reason: impl Into<String>) -> Self {
        Self::MalformedRule {
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidParameter` error.
    pub fn invalid_parameter(
        validator: impl Into<String>,
        param: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            validator: validator.into(),
            param: param.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
