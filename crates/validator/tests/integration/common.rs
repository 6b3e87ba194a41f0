//! Shared fixtures.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use precond_validator::prelude::*;

/// Installs a test-writer subscriber once, so `tracing` output shows up in
/// failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Counts how many times units built from it have run.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// A factory whose units record a call and pass.
    pub fn passing(
        &self,
    ) -> impl Fn(&Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> + Send + Sync + use<>
    {
        let calls = Arc::clone(&self.0);
        move |_params| {
            let calls = Arc::clone(&calls);
            Ok(Box::new(FnValidator::new("counted", move |_target, _attribute| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })))
        }
    }
}

/// A factory whose units always record an error.
pub fn failing(_params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> {
    Ok(Box::new(FnValidator::new("failing", |_target, attribute| {
        Err(ValidationError::new("failing", "Always fails").with_field(attribute.to_owned()))
    })))
}

/// The default registry.
pub fn registry() -> ValidatorRegistry {
    ValidatorRegistry::with_defaults()
}
