//! Conditional rule validator
//!
//! Runs a primary rule for an attribute only when a tree of prerequisite
//! rules holds. Prerequisites are evaluated against a [`Trial`] duplicate of
//! the object, so their errors never reach it; only the primary rule writes
//! to the object.
//!
//! "Not applicable" is not the same as "valid": when the prerequisites fail
//! the primary rule is simply not run and nothing is recorded.
//!
//! # Examples
//!
//! ```rust
//! use precond_validator::prelude::*;
//! use serde_json::json;
//!
//! // `status` is required, but only for admins.
//! let validator = ConditionalValidator::new(PrimaryRule::new("required"))
//!     .with_conditions(RuleSpec::from_value(&json!({
//!         "group": [["role", "compare", {"compareValue": "admin"}]]
//!     }))?);
//!
//! let registry = ValidatorRegistry::with_defaults();
//!
//! let mut guest = Model::new().with_attribute("role", "guest");
//! validator.validate_attribute(&registry, &mut guest, "status")?;
//! assert!(!guest.has_errors());
//!
//! let mut admin = Model::new().with_attribute("role", "admin");
//! validator.validate_attribute(&registry, &mut admin, "status")?;
//! assert!(admin.has_errors_for("status"));
//! # Ok::<(), ConfigurationError>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigurationError;
use crate::evaluator::{ConditionEvaluator, DEFAULT_MAX_DEPTH};
use crate::registry::{AttributeValidator, ValidatorRegistry};
use crate::rule::{self, AttributeSelector, GroupMode, Params, RuleSpec, ValidatorId};
use crate::target::{Trial, ValidationTarget};

const ID: &str = "conditional";
const PARAMS: &[&str] = &[
    "conditionalRules",
    "rule",
    "skipConditional",
    "clientValidationJS",
    "strictGroups",
    "maxDepth",
];

// ============================================================================
// PRIMARY RULE
// ============================================================================

/// The rule applied when the prerequisites hold: a validator identifier and
/// its parameters. The attribute comes from the call.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryRule {
    /// Registered validator unit to instantiate.
    pub validator: ValidatorId,
    /// Named options handed to the unit.
    pub params: Params,
}

impl PrimaryRule {
    /// Creates a primary rule without parameters.
    pub fn new(validator: impl Into<ValidatorId>) -> Self {
        Self {
            validator: validator.into(),
            params: Params::new(),
        }
    }

    /// Adds a named parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Reads `"id"` or `["id", {params}...]`.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        match value {
            Value::String(_) => Ok(Self {
                validator: rule::validator_id(value)?,
                params: Params::new(),
            }),
            Value::Array(items) => {
                let Some((first, rest)) = items.split_first() else {
                    return Err(ConfigurationError::malformed_rule(
                        "the primary rule needs a validator identifier",
                    ));
                };
                let validator = rule::validator_id(first)?;
                let mut params = Params::new();
                for extra in rest {
                    let object = Params::from_object(extra).ok_or_else(|| {
                        ConfigurationError::malformed_rule(format!(
                            "parameters of '{validator}' must be objects, found {}",
                            rule::kind(extra)
                        ))
                    })?;
                    params.merge(object);
                }
                Ok(Self { validator, params })
            }
            other => Err(ConfigurationError::malformed_rule(format!(
                "expected a primary rule, found {}",
                rule::kind(other)
            ))),
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Serializable form of a [`ConditionalValidator`].
///
/// Rules are kept in array/object notation and only parsed by
/// [`ConditionalValidator::from_config`].
///
/// ```rust
/// use precond_validator::conditional::{ConditionalConfig, ConditionalValidator};
/// use serde_json::json;
///
/// let config: ConditionalConfig = serde_json::from_value(json!({
///     "conditionalRules": {"group": [["role", "required"]]},
///     "rule": ["length", {"max": 10}],
///     "clientValidationJS": "check(value)"
/// }))?;
///
/// let validator = ConditionalValidator::from_config(&config)?;
/// assert_eq!(validator.conditions().leaf_count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionalConfig {
    /// Prerequisite tree. `null` or `[]` means no prerequisites.
    pub conditional_rules: Value,
    /// Primary rule, `"id"` or `["id", {params}...]`.
    pub rule: Value,
    /// Run the primary rule without checking prerequisites.
    pub skip_conditional: bool,
    /// Client-side script returned verbatim.
    #[serde(rename = "clientValidationJS", skip_serializing_if = "Option::is_none")]
    pub client_validation_js: Option<String>,
    /// Reject non-rule group entries instead of skipping them.
    pub strict_groups: bool,
    /// Group nesting limit, at least 1; defaults to [`DEFAULT_MAX_DEPTH`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

// ============================================================================
// CONDITIONAL VALIDATOR
// ============================================================================

/// Applies a primary rule only when its prerequisite rules hold.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalValidator {
    conditional_rules: RuleSpec,
    rule: PrimaryRule,
    skip_conditional: bool,
    client_validation_js: Option<String>,
    max_depth: usize,
}

impl ConditionalValidator {
    /// Creates a validator without prerequisites.
    pub fn new(rule: PrimaryRule) -> Self {
        Self {
            conditional_rules: RuleSpec::empty(),
            rule,
            skip_conditional: false,
            client_validation_js: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the prerequisite tree.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_conditions(mut self, conditions: impl Into<RuleSpec>) -> Self {
        self.conditional_rules = conditions.into();
        self
    }

    /// Bypasses the prerequisites when `true`.
    #[must_use = "builder methods must be chained or built"]
    pub fn skip_conditional(mut self, skip: bool) -> Self {
        self.skip_conditional = skip;
        self
    }

    /// Sets the client-side script.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_client_script(mut self, script: impl Into<String>) -> Self {
        self.client_validation_js = Some(script.into());
        self
    }

    /// Sets the group nesting limit for the prerequisites.
    ///
    /// The root group always counts, so a limit of `0` is raised to `1`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Builds a validator from its serializable form.
    ///
    /// This is where a malformed prerequisite tree or primary rule is
    /// reported.
    pub fn from_config(config: &ConditionalConfig) -> Result<Self, ConfigurationError> {
        let mode = if config.strict_groups {
            GroupMode::Strict
        } else {
            GroupMode::Lenient
        };
        let conditional_rules = match &config.conditional_rules {
            Value::Null => RuleSpec::empty(),
            Value::Array(items) if items.is_empty() => RuleSpec::empty(),
            other => RuleSpec::parse(other, mode)?,
        };
        if config.rule.is_null() {
            return Err(ConfigurationError::malformed_rule("missing primary rule"));
        }
        if config.max_depth == Some(0) {
            return Err(ConfigurationError::invalid_parameter(
                ID,
                "maxDepth",
                "must be at least 1",
            ));
        }

        Ok(Self {
            conditional_rules,
            rule: PrimaryRule::from_value(&config.rule)?,
            skip_conditional: config.skip_conditional,
            client_validation_js: config.client_validation_js.clone(),
            max_depth: config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        })
    }

    /// Registry factory for `conditional`.
    ///
    /// Reads `conditionalRules`, `rule`, `skipConditional`,
    /// `clientValidationJS`, `strictGroups` and `maxDepth`.
    pub fn factory(params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> {
        params.deny_unknown(ID, PARAMS)?;
        let config = ConditionalConfig {
            conditional_rules: params.get("conditionalRules").cloned().unwrap_or_default(),
            rule: params
                .get("rule")
                .cloned()
                .ok_or_else(|| ConfigurationError::invalid_parameter(ID, "rule", "missing"))?,
            skip_conditional: params.bool(ID, "skipConditional")?.unwrap_or(false),
            client_validation_js: params.str(ID, "clientValidationJS")?.map(str::to_owned),
            strict_groups: params.bool(ID, "strictGroups")?.unwrap_or(false),
            max_depth: params.usize(ID, "maxDepth")?,
        };
        Ok(Box::new(Self::from_config(&config)?))
    }

    /// The prerequisite tree.
    #[must_use]
    pub fn conditions(&self) -> &RuleSpec {
        &self.conditional_rules
    }

    /// The primary rule.
    #[must_use]
    pub fn rule(&self) -> &PrimaryRule {
        &self.rule
    }

    /// Whether prerequisites are bypassed.
    #[must_use]
    pub fn skips_conditional(&self) -> bool {
        self.skip_conditional
    }

    /// Validates each of `attributes` in turn.
    pub fn validate<I>(
        &self,
        registry: &ValidatorRegistry,
        object: &mut dyn ValidationTarget,
        attributes: I,
    ) -> Result<(), ConfigurationError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for attribute in attributes {
            self.validate_attribute(registry, object, attribute.as_ref())?;
        }
        Ok(())
    }

    /// The client-side script, verbatim. An empty script counts as none.
    #[must_use]
    pub fn client_side_script(&self, _object: &dyn ValidationTarget, _attribute: &str) -> Option<&str> {
        self.client_validation_js.as_deref().filter(|script| !script.is_empty())
    }

    /// Evaluates the prerequisites against a duplicate of `object`.
    fn prerequisites_hold(
        &self,
        registry: &ValidatorRegistry,
        object: &dyn ValidationTarget,
    ) -> Result<bool, ConfigurationError> {
        let mut trial = Trial::acquire(object);
        ConditionEvaluator::new(registry)
            .with_max_depth(self.max_depth)
            .evaluate(trial.target_mut(), &self.conditional_rules)
    }
}

impl AttributeValidator for ConditionalValidator {
    fn validate_attribute(
        &self,
        registry: &ValidatorRegistry,
        target: &mut dyn ValidationTarget,
        attribute: &str,
    ) -> Result<(), ConfigurationError> {
        if !self.skip_conditional && !self.prerequisites_hold(registry, &*target)? {
            debug!(
                attribute,
                validator = %self.rule.validator,
                "prerequisites failed, primary rule not applied"
            );
            return Ok(());
        }

        registry
            .instantiate(
                &self.rule.validator,
                AttributeSelector::single(attribute),
                &self.rule.params,
            )?
            .run_attribute(registry, target, attribute)
    }

    fn client_script(&self, target: &dyn ValidationTarget, attribute: &str) -> Option<String> {
        self.client_side_script(target, attribute).map(str::to_owned)
    }
}
