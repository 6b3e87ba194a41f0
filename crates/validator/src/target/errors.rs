//! Per-attribute error collection

use std::fmt;

use indexmap::IndexMap;

use crate::error::ValidationError;

/// Errors recorded on a validation target, keyed by attribute.
///
/// Attributes keep the order in which they first failed; messages keep the
/// order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeErrors {
    errors: IndexMap<String, Vec<ValidationError>>,
}

impl AttributeErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for an attribute.
    pub fn add(&mut self, attribute: impl Into<String>, error: ValidationError) {
        self.errors.entry(attribute.into()).or_default().push(error);
    }

    /// Returns `true` if any attribute has errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|list| !list.is_empty())
    }

    /// Returns `true` if the attribute has errors.
    #[must_use]
    pub fn has_errors_for(&self, attribute: &str) -> bool {
        self.errors.get(attribute).is_some_and(|list| !list.is_empty())
    }

    /// Errors recorded for an attribute, oldest first.
    #[must_use]
    pub fn for_attribute(&self, attribute: &str) -> &[ValidationError] {
        self.errors.get(attribute).map_or(&[], Vec::as_slice)
    }

    /// First error recorded for an attribute.
    #[must_use]
    pub fn first(&self, attribute: &str) -> Option<&ValidationError> {
        self.for_attribute(attribute).first()
    }

    /// Mutable access to an attribute's errors.
    pub fn for_attribute_mut(&mut self, attribute: &str) -> Option<&mut Vec<ValidationError>> {
        self.errors.get_mut(attribute)
    }

    /// Number of errors recorded for an attribute.
    #[must_use]
    pub fn count_for(&self, attribute: &str) -> usize {
        self.for_attribute(attribute).len()
    }

    /// Total number of errors across all attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }

    /// Attributes with at least one error, in first-failure order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(attribute, _)| attribute.as_str())
    }

    /// Iterates `(attribute, errors)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationError])> {
        self.errors
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(attribute, list)| (attribute.as_str(), list.as_slice()))
    }

    /// Removes every error.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Removes the errors of one attribute.
    pub fn clear_attribute(&mut self, attribute: &str) {
        self.errors.shift_remove(attribute);
    }

    /// Records how many errors each attribute has right now.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            counts: self
                .errors
                .iter()
                .map(|(attribute, list)| (attribute.clone(), list.len()))
                .collect(),
        }
    }

    /// Number of errors added since `checkpoint` was taken.
    #[must_use]
    pub fn added_since(&self, checkpoint: &Checkpoint) -> usize {
        self.errors
            .iter()
            .map(|(attribute, list)| list.len().saturating_sub(checkpoint.count_for(attribute)))
            .sum()
    }

    /// Drops every error added since `checkpoint` was taken.
    ///
    /// Errors removed in the meantime are not restored.
    pub fn rollback(&mut self, checkpoint: &Checkpoint) {
        self.errors.retain(|attribute, list| match checkpoint.counts.get(attribute) {
            Some(&kept) => {
                list.truncate(kept);
                true
            }
            None => false,
        });
    }
}

/// Per-attribute error counts taken by [`AttributeErrors::checkpoint`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    counts: IndexMap<String, usize>,
}

impl Checkpoint {
    fn count_for(&self, attribute: &str) -> usize {
        self.counts.get(attribute).copied().unwrap_or(0)
    }
}

impl fmt::Display for AttributeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (attribute, list) in self.iter() {
            for error in list {
                writeln!(f, "  {attribute}: {}", error.message)?;
            }
        }
        Ok(())
    }
}
