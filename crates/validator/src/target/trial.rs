//! Scoped disposable duplicate

use std::ops::{Deref, DerefMut};

use tracing::trace;

use super::ValidationTarget;

/// An independent copy of a target, used for trial validations.
///
/// The copy starts with an empty error collection, so after running a
/// validator against it every recorded error came from that run. Nothing
/// written to a `Trial` reaches the original, and the copy is discarded when
/// the guard is dropped, on every exit path.
pub struct Trial<'a> {
    target: Box<dyn ValidationTarget + 'a>,
}

impl<'a> Trial<'a> {
    /// Duplicates `original` and clears the duplicate's errors.
    #[must_use]
    pub fn acquire(original: &'a (dyn ValidationTarget + 'a)) -> Self {
        let mut target = dyn_clone::clone_box(original);
        target.clear_errors();
        Self { target }
    }

    /// The duplicate, for handing to the evaluator.
    pub fn target_mut(&mut self) -> &mut (dyn ValidationTarget + 'a) {
        self.target.as_mut()
    }
}

impl<'a> Deref for Trial<'a> {
    type Target = dyn ValidationTarget + 'a;

    fn deref(&self) -> &Self::Target {
        self.target.as_ref()
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.target.as_mut()
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        trace!(
            leftover_errors = self.target.errors().len(),
            "discarding trial duplicate"
        );
    }
}

impl std::fmt::Debug for Trial<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trial").field("target", &self.target).finish()
    }
}
