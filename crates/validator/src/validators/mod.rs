//! Reference validator units
//!
//! A small set, registered by
//! [`ValidatorRegistry::with_defaults`](crate::registry::ValidatorRegistry::with_defaults):
//!
//! | Id         | Unit                      | Parameters                                              |
//! |------------|---------------------------|---------------------------------------------------------|
//! | `required` | [`Required`]              | `requiredValue`, `trim` (default `true`)                |
//! | `length`   | [`Length`]                | `min`, `max`, `is`, `allowEmpty` (default `true`)       |
//! | `match`    | [`Pattern`]               | `pattern` (required), `not`, `allowEmpty` (default `true`) |
//! | `compare`  | [`Compare`]               | `compareAttribute`, `compareValue`, `operator`, `allowEmpty` |
//!
//! Hosts plug in their own units through [`ValueRule`] (any
//! [`Validate`](crate::foundation::Validate) over JSON values) or
//! [`FnValidator`] (a closure with access to the whole target).

pub mod compare;
pub mod length;
pub mod pattern;
pub mod required;

pub use compare::{Compare, CompareOperator};
pub use length::Length;
pub use pattern::Pattern;
pub use required::{Required, required};

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::error::{ConfigurationError, ValidationError};
use crate::foundation::Validate;
use crate::registry::{AttributeValidator, ValidatorRegistry};
use crate::target::ValidationTarget;

static NULL: Value = Value::Null;

// ============================================================================
// VALUE RULE
// ============================================================================

/// Lifts a value validator into a registry unit.
///
/// A missing attribute is validated as `null`. Recorded errors carry the
/// attribute name as their field.
#[derive(Debug, Clone)]
pub struct ValueRule<V> {
    validator: V,
}

impl<V> ValueRule<V> {
    /// Wraps a value validator.
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    /// The wrapped validator.
    pub fn validator(&self) -> &V {
        &self.validator
    }
}

impl<V> AttributeValidator for ValueRule<V>
where
    V: Validate<Input = Value> + Send + Sync + fmt::Debug,
{
    fn validate_attribute(
        &self,
        _registry: &ValidatorRegistry,
        target: &mut dyn ValidationTarget,
        attribute: &str,
    ) -> Result<(), ConfigurationError> {
        let outcome = self.validator.validate(target.attribute(attribute).unwrap_or(&NULL));
        if let Err(error) = outcome {
            target.add_error(attribute, error.with_field(attribute.to_owned()));
        }
        Ok(())
    }
}

// ============================================================================
// FN VALIDATOR
// ============================================================================

/// A closure unit with read access to the whole target.
///
/// ```rust
/// use precond_validator::prelude::*;
/// use serde_json::json;
///
/// let even = FnValidator::new("even", |target, attribute| {
///     match target.attribute(attribute).and_then(|v| v.as_i64()) {
///         Some(n) if n % 2 == 0 => Ok(()),
///         _ => Err(ValidationError::new("even", "Must be even")),
///     }
/// });
///
/// let registry = ValidatorRegistry::new();
/// let mut model = Model::new().with_attribute("n", json!(3));
/// even.validate_attribute(&registry, &mut model, "n")?;
/// assert!(model.has_errors_for("n"));
/// # Ok::<(), ConfigurationError>(())
/// ```
pub struct FnValidator<F> {
    name: Cow<'static, str>,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&dyn ValidationTarget, &str) -> Result<(), ValidationError> + Send + Sync,
{
    /// Creates a closure unit; `name` only shows up in `Debug` output.
    pub fn new(name: impl Into<Cow<'static, str>>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> AttributeValidator for FnValidator<F>
where
    F: Fn(&dyn ValidationTarget, &str) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate_attribute(
        &self,
        _registry: &ValidatorRegistry,
        target: &mut dyn ValidationTarget,
        attribute: &str,
    ) -> Result<(), ConfigurationError> {
        if let Err(error) = (self.check)(&*target, attribute) {
            let error = match error.field {
                Some(_) => error,
                None => error.with_field(attribute.to_owned()),
            };
            target.add_error(attribute, error);
        }
        Ok(())
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("name", &self.name)
            .field("check", &"<function>")
            .finish()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Emptiness as the reference units understand it: `null`, an empty (or,
/// with `trim`, whitespace-only) string, an empty array or object.
#[must_use]
pub fn is_empty(value: &Value, trim: bool) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) if trim => s.trim().is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(members) => members.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Text form of a scalar, as used by `length` and `match`.
pub(crate) fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "1" } else { "" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
