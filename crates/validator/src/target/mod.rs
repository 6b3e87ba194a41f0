//! Validation targets
//!
//! A target is the object under validation: it exposes attributes by name,
//! owns an [`AttributeErrors`] collection and may carry a scenario name.
//! Condition checks never run against the caller's object directly; they run
//! against a [`Trial`], a scoped duplicate that is dropped when the check is
//! over.

mod errors;
mod model;
mod trial;

pub use errors::{AttributeErrors, Checkpoint};
pub use model::Model;
pub use trial::Trial;

use dyn_clone::DynClone;
use serde_json::Value;

use crate::error::ValidationError;

/// The object under validation.
///
/// The trait is object safe; validator units receive `&mut dyn
/// ValidationTarget`. Implementors must be `Clone`: the [`DynClone`]
/// super-trait lets a [`Trial`] duplicate a target behind `dyn`.
pub trait ValidationTarget: DynClone {
    /// Reads an attribute by name.
    fn attribute(&self, name: &str) -> Option<&Value>;

    /// The scenario the target is validated under, if any.
    fn scenario(&self) -> Option<&str> {
        None
    }

    /// The error collection.
    fn errors(&self) -> &AttributeErrors;

    /// Mutable access to the error collection.
    fn errors_mut(&mut self) -> &mut AttributeErrors;

    /// Records an error for an attribute.
    fn add_error(&mut self, attribute: &str, error: ValidationError) {
        self.errors_mut().add(attribute, error);
    }

    /// Returns `true` if any attribute has errors.
    fn has_errors(&self) -> bool {
        self.errors().has_errors()
    }

    /// Returns `true` if the attribute has errors.
    fn has_errors_for(&self, attribute: &str) -> bool {
        self.errors().has_errors_for(attribute)
    }

    /// Removes every recorded error.
    fn clear_errors(&mut self) {
        self.errors_mut().clear();
    }
}

impl std::fmt::Debug for dyn ValidationTarget + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationTarget")
            .field("scenario", &self.scenario())
            .field("errors", self.errors())
            .finish_non_exhaustive()
    }
}
