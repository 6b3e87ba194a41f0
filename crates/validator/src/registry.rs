//! Validator registry
//!
//! Maps a [`ValidatorId`] to a [`ValidatorFactory`] that builds a
//! [`AttributeValidator`] unit from named parameters. Rules refer to units by
//! identifier only; [`ValidatorRegistry::instantiate`] binds a unit to an
//! attribute selector and the options every unit shares:
//!
//! | Parameter     | Meaning                                                  |
//! |---------------|----------------------------------------------------------|
//! | `on`          | run only under the listed scenarios                      |
//! | `except`      | never run under the listed scenarios                     |
//! | `skipOnError` | skip attributes that already have errors                 |
//! | `message`     | replace the message of every error the unit records; `{attribute}` is substituted |
//!
//! These are removed before the factory sees the parameters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::conditional::ConditionalValidator;
use crate::error::ConfigurationError;
use crate::rule::{AttributeSelector, Params, ValidatorId};
use crate::target::ValidationTarget;
use crate::validators;

// ============================================================================
// TRAITS
// ============================================================================

/// A pluggable unit that checks one attribute and records errors on failure.
pub trait AttributeValidator: Send + Sync + fmt::Debug {
    /// Validates `attribute` of `target`, recording errors on the target.
    ///
    /// Data failures are recorded, never returned. `Err` is reserved for
    /// configuration problems discovered while running (for example a
    /// nested rule naming an unknown validator).
    fn validate_attribute(
        &self,
        registry: &ValidatorRegistry,
        target: &mut dyn ValidationTarget,
        attribute: &str,
    ) -> Result<(), ConfigurationError>;

    /// Client-side script for the attribute, if the unit provides one.
    fn client_script(&self, _target: &dyn ValidationTarget, _attribute: &str) -> Option<String> {
        None
    }
}

/// Builds a unit from named parameters.
pub trait ValidatorFactory: Send + Sync {
    /// Creates a unit, rejecting bad parameters with a `ConfigurationError`.
    fn create(&self, params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError>;
}

impl<F> ValidatorFactory for F
where
    F: Fn(&Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> + Send + Sync,
{
    fn create(&self, params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> {
        self(params)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Identifier → factory lookup.
///
/// Immutable once built, and cheap to clone: factories are shared.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    factories: HashMap<ValidatorId, Arc<dyn ValidatorFactory>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the reference units and `conditional`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register("required", validators::required::factory)
            .register("length", validators::length::factory)
            .register("match", validators::pattern::factory)
            .register("compare", validators::compare::factory)
            .register("conditional", ConditionalValidator::factory);
        registry
    }

    /// Registers a factory, replacing any previous one under the same id.
    pub fn register(
        &mut self,
        id: impl Into<ValidatorId>,
        factory: impl ValidatorFactory + 'static,
    ) -> &mut Self {
        let id = id.into();
        if self.factories.insert(id.clone(), Arc::new(factory)).is_some() {
            debug!(validator = %id, "replaced validator factory");
        } else {
            debug!(validator = %id, "registered validator factory");
        }
        self
    }

    /// Registers a factory, builder style.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, id: impl Into<ValidatorId>, factory: impl ValidatorFactory + 'static) -> Self {
        self.register(id, factory);
        self
    }

    /// Returns `true` if a factory is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(&ValidatorId::new(id))
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&ValidatorId> {
        let mut ids: Vec<_> = self.factories.keys().collect();
        ids.sort();
        ids
    }

    /// Builds the unit `id` and binds it to `attributes`.
    pub fn instantiate(
        &self,
        id: &ValidatorId,
        attributes: AttributeSelector,
        params: &Params,
    ) -> Result<BoundValidator, ConfigurationError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownValidator { id: id.clone() })?;

        let mut params = params.clone();
        let options = CommonOptions::extract(id.as_str(), &mut params)?;
        trace!(validator = %id, attributes = %attributes, "instantiating validator");
        let unit = factory.create(&params)?;

        Ok(BoundValidator {
            id: id.clone(),
            attributes,
            options,
            unit,
        })
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

// ============================================================================
// COMMON OPTIONS
// ============================================================================

/// Options shared by every unit, parsed by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonOptions {
    /// Scenarios the unit runs under; empty means all.
    pub on: Vec<String>,
    /// Scenarios the unit never runs under.
    pub except: Vec<String>,
    /// Skip attributes that already have errors.
    pub skip_on_error: bool,
    /// Replacement message for recorded errors.
    pub message: Option<String>,
}

impl CommonOptions {
    /// Removes the common options from `params` and parses them.
    pub fn extract(validator: &str, params: &mut Params) -> Result<Self, ConfigurationError> {
        let options = Self {
            on: params.names(validator, "on")?.unwrap_or_default(),
            except: params.names(validator, "except")?.unwrap_or_default(),
            skip_on_error: params.bool(validator, "skipOnError")?.unwrap_or(false),
            message: params.str(validator, "message")?.map(str::to_owned),
        };
        for key in ["on", "except", "skipOnError", "message"] {
            params.remove(key);
        }
        Ok(options)
    }

    /// Whether the unit runs under `scenario`.
    ///
    /// A target without a scenario only matches units without `on`.
    #[must_use]
    pub fn applies_to(&self, scenario: Option<&str>) -> bool {
        match scenario {
            Some(scenario) => {
                !self.except.iter().any(|s| s == scenario)
                    && (self.on.is_empty() || self.on.iter().any(|s| s == scenario))
            }
            None => self.on.is_empty(),
        }
    }
}

// ============================================================================
// BOUND VALIDATOR
// ============================================================================

/// A unit bound to an attribute selector and its common options.
#[derive(Debug)]
pub struct BoundValidator {
    id: ValidatorId,
    attributes: AttributeSelector,
    options: CommonOptions,
    unit: Box<dyn AttributeValidator>,
}

impl BoundValidator {
    /// The identifier the unit was built from.
    #[must_use]
    pub fn id(&self) -> &ValidatorId {
        &self.id
    }

    /// The attributes the unit runs against.
    #[must_use]
    pub fn attributes(&self) -> &AttributeSelector {
        &self.attributes
    }

    /// The parsed common options.
    #[must_use]
    pub fn options(&self) -> &CommonOptions {
        &self.options
    }

    /// Runs the unit for every selected attribute.
    pub fn run(
        &self,
        registry: &ValidatorRegistry,
        target: &mut dyn ValidationTarget,
    ) -> Result<(), ConfigurationError> {
        for attribute in self.attributes.names() {
            self.run_attribute(registry, target, attribute)?;
        }
        Ok(())
    }

    /// Runs the unit for one attribute, honouring the common options.
    pub fn run_attribute(
        &self,
        registry: &ValidatorRegistry,
        target: &mut dyn ValidationTarget,
        attribute: &str,
    ) -> Result<(), ConfigurationError> {
        if !self.options.applies_to(target.scenario()) {
            trace!(validator = %self.id, attribute, scenario = ?target.scenario(), "not applicable in scenario");
            return Ok(());
        }
        if self.options.skip_on_error && target.has_errors_for(attribute) {
            trace!(validator = %self.id, attribute, "attribute already has errors, skipping");
            return Ok(());
        }

        let before = target.errors().count_for(attribute);
        self.unit.validate_attribute(registry, target, attribute)?;

        if let Some(template) = &self.options.message {
            if let Some(recorded) = target.errors_mut().for_attribute_mut(attribute) {
                let message = template.replace("{attribute}", attribute);
                for error in recorded.iter_mut().skip(before) {
                    error.message = message.clone().into();
                }
            }
        }
        Ok(())
    }

    /// Client-side script of the unit, if any.
    #[must_use]
    pub fn client_script(&self, target: &dyn ValidationTarget, attribute: &str) -> Option<String> {
        self.unit.client_script(target, attribute)
    }
}
