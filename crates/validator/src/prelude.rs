//! Prelude module for convenient imports.
//!
//! Provides a single `use precond_validator::prelude::*;` import that brings
//! in the traits, rule types, targets and validators most callers need.

// ============================================================================
// FOUNDATION: Core traits and errors
// ============================================================================

pub use crate::error::{ConfigurationError, ValidationError};
pub use crate::foundation::{Validate, ValidationResult};

// ============================================================================
// RULES AND REGISTRY
// ============================================================================

pub use crate::registry::{AttributeValidator, BoundValidator, CommonOptions, ValidatorRegistry};
pub use crate::rule::{AttributeSelector, GroupMode, GroupRule, Params, RuleSpec, SimpleRule, ValidatorId};

// ============================================================================
// TARGETS
// ============================================================================

pub use crate::target::{AttributeErrors, Model, Trial, ValidationTarget};

// ============================================================================
// EVALUATION
// ============================================================================

pub use crate::conditional::{ConditionalConfig, ConditionalValidator, PrimaryRule};
pub use crate::evaluator::ConditionEvaluator;

// ============================================================================
// VALIDATORS
// ============================================================================

pub use crate::validators::{
    Compare, CompareOperator, FnValidator, Length, Pattern, Required, ValueRule, required,
};
