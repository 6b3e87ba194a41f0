//! Condition tree evaluator
//!
//! Decides whether a [`RuleSpec`] holds for a target. Groups are evaluated as
//! a short-circuit AND over their children, in order: the first child that
//! does not hold ends the group and its remaining siblings are never run. An
//! empty group holds.
//!
//! A simple rule holds when running its validator adds no errors to the
//! target. When it does, exactly those errors are removed before returning
//! `false`, so each rule is judged on its own output and errors the target
//! already carried are left alone. Conditional validation runs this against a
//! disposable [`Trial`](crate::target::Trial) duplicate.
//!
//! # Examples
//!
//! ```rust
//! use precond_validator::prelude::*;
//! use serde_json::json;
//!
//! let registry = ValidatorRegistry::with_defaults();
//! let evaluator = ConditionEvaluator::new(&registry);
//! let spec = RuleSpec::from_value(&json!({"group": [["role", "required"]]}))?;
//!
//! let mut trial = Model::new().with_attribute("role", "admin");
//! assert!(evaluator.evaluate(&mut trial, &spec)?);
//!
//! let mut trial = Model::new();
//! assert!(!evaluator.evaluate(&mut trial, &spec)?);
//! assert!(!trial.has_errors());
//! # Ok::<(), ConfigurationError>(())
//! ```

use tracing::{debug, trace};

use crate::error::ConfigurationError;
use crate::registry::ValidatorRegistry;
use crate::rule::{GroupRule, RuleSpec, SimpleRule};
use crate::target::ValidationTarget;

/// Group nesting allowed before evaluation is refused.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Evaluates rule specifications against a target.
#[derive(Debug, Clone, Copy)]
pub struct ConditionEvaluator<'r> {
    registry: &'r ValidatorRegistry,
    max_depth: usize,
}

impl<'r> ConditionEvaluator<'r> {
    /// Creates an evaluator resolving validators through `registry`.
    #[must_use]
    pub fn new(registry: &'r ValidatorRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the nesting limit.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The nesting limit.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns `true` if `spec` holds for `target`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationError`] raised while instantiating or running a
    /// validator, and [`ConfigurationError::NestingTooDeep`] when groups nest
    /// deeper than [`max_depth`](Self::max_depth). Evaluation stops at the
    /// first error.
    pub fn evaluate(
        &self,
        target: &mut dyn ValidationTarget,
        spec: &RuleSpec,
    ) -> Result<bool, ConfigurationError> {
        self.evaluate_at(target, spec, 0)
    }

    fn evaluate_at(
        &self,
        target: &mut dyn ValidationTarget,
        spec: &RuleSpec,
        depth: usize,
    ) -> Result<bool, ConfigurationError> {
        match spec {
            RuleSpec::Group(group) => self.evaluate_group(target, group, depth + 1),
            RuleSpec::Simple(rule) => self.evaluate_simple(target, rule, depth),
        }
    }

    fn evaluate_group(
        &self,
        target: &mut dyn ValidationTarget,
        group: &GroupRule,
        depth: usize,
    ) -> Result<bool, ConfigurationError> {
        if depth > self.max_depth {
            return Err(ConfigurationError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        trace!(group = %group.name, depth, children = group.rules.len(), "evaluating group");

        for (index, child) in group.rules.iter().enumerate() {
            if !self.evaluate_at(target, child, depth)? {
                debug!(
                    group = %group.name,
                    index,
                    skipped = group.rules.len() - index - 1,
                    "group condition failed"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn evaluate_simple(
        &self,
        target: &mut dyn ValidationTarget,
        rule: &SimpleRule,
        depth: usize,
    ) -> Result<bool, ConfigurationError> {
        trace!(
            validator = %rule.validator,
            attributes = %rule.attributes,
            depth,
            "evaluating rule"
        );

        let bound = self
            .registry
            .instantiate(&rule.validator, rule.attributes.clone(), &rule.params)?;
        let checkpoint = target.errors().checkpoint();
        bound.run(self.registry, target)?;

        let added = target.errors().added_since(&checkpoint);
        if added > 0 {
            debug!(
                validator = %rule.validator,
                attributes = %rule.attributes,
                errors = added,
                "condition failed"
            );
            target.errors_mut().rollback(&checkpoint);
            return Ok(false);
        }
        Ok(true)
    }
}
