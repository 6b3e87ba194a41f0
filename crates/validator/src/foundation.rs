//! Value-level validation trait
//!
//! [`Validate`] checks a single value and knows nothing about targets,
//! attributes or registries. [`ValueRule`](crate::validators::ValueRule)
//! lifts any `Validate<Input = serde_json::Value>` into a registry unit.
//!
//! ```rust
//! use precond_validator::foundation::{Validate, ValidationError};
//!
//! struct NonNegative;
//!
//! impl Validate for NonNegative {
//!     type Input = i64;
//!
//!     fn validate(&self, input: &i64) -> Result<(), ValidationError> {
//!         if *input >= 0 {
//!             Ok(())
//!         } else {
//!             Err(ValidationError::new("negative", "Must not be negative"))
//!         }
//!     }
//! }
//!
//! assert!(NonNegative.validate(&3).is_ok());
//! assert!(NonNegative.validate(&-3).is_err());
//! ```

pub use crate::error::ValidationError;

/// A validation result using the standard `ValidationError`.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks one value.
///
/// `Input` may be unsized (`str`, `[T]`).
pub trait Validate {
    /// The type of input being validated.
    type Input: ?Sized;

    /// Validates the input value.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if validation succeeds
    /// * `Err(ValidationError)` if validation fails
    fn validate(&self, input: &Self::Input) -> ValidationResult<()>;
}

impl<V: Validate + ?Sized> Validate for &V {
    type Input = V::Input;

    fn validate(&self, input: &Self::Input) -> ValidationResult<()> {
        (**self).validate(input)
    }
}
