//! # precond-validator
//!
//! Conditional attribute validation: apply a rule to an attribute only when a
//! tree of prerequisite rules holds for the object.
//!
//! ## Quick Start
//!
//! ```rust
//! use precond_validator::prelude::*;
//! use serde_json::json;
//!
//! // `status` must be at most 8 characters, but only for admins.
//! let config: ConditionalConfig = serde_json::from_value(json!({
//!     "conditionalRules": {"group": [
//!         ["role", "required"],
//!         ["role", "compare", {"compareValue": "admin"}]
//!     ]},
//!     "rule": ["length", {"max": 8}]
//! }))?;
//! let validator = ConditionalValidator::from_config(&config)?;
//! let registry = ValidatorRegistry::with_defaults();
//!
//! let mut user = Model::new()
//!     .with_attribute("role", "admin")
//!     .with_attribute("status", "suspended-pending");
//! validator.validate_attribute(&registry, &mut user, "status")?;
//! assert_eq!(user.errors().first("status").map(|e| &*e.code), Some("too_long"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Building blocks
//!
//! - [`rule`]: rule specifications ([`RuleSpec`](rule::RuleSpec)) and their
//!   array/object notation
//! - [`registry`]: validator identifiers mapped to factories, plus the options
//!   every validator shares (`on`, `except`, `skipOnError`, `message`)
//! - [`target`]: the object under validation and its disposable duplicate
//! - [`evaluator`]: short-circuit evaluation of prerequisite trees
//! - [`conditional`]: the conditional validator itself
//! - [`validators`]: the reference units `required`, `length`, `match`, `compare`
//!
//! Custom units implement [`AttributeValidator`](registry::AttributeValidator),
//! or the [`Validate`](foundation::Validate) trait over JSON values (see the
//! [`validator!`] macro) wrapped in [`ValueRule`](validators::ValueRule).

// ValidationError is the fundamental error type for all validators; boxing it
// would add indirection to every validation call.
#![allow(clippy::result_large_err)]

pub mod conditional;
pub mod error;
pub mod evaluator;
pub mod foundation;
mod macros;
pub mod prelude;
pub mod registry;
pub mod rule;
pub mod target;
pub mod validators;

pub use conditional::{ConditionalConfig, ConditionalValidator, PrimaryRule};
pub use error::{ConfigurationError, ValidationError};
pub use evaluator::ConditionEvaluator;
pub use registry::ValidatorRegistry;
