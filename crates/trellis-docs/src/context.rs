//! The registration context.
//!
//! Created once by the application bootstrap and passed to everything that
//! registers routes. All clones share one lazily created
//! [`DocumentBuilder`]; concurrent first use still creates exactly one.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::builder::{DocumentBuilder, DocumentConfig};

/// Shared handle to the process's document builder.
#[derive(Clone, Default)]
pub struct RegistrationContext {
    builder: Arc<OnceLock<Arc<DocumentBuilder>>>,
}

impl RegistrationContext {
    /// Creates an uninitialised context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context around an existing builder.
    pub fn with_builder(builder: DocumentBuilder) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Arc::new(builder));
        Self {
            builder: Arc::new(cell),
        }
    }

    /// Returns the builder, creating it from `config` on first use.
    ///
    /// `config` runs at most once across all clones.
    pub fn builder(&self, config: impl FnOnce() -> DocumentConfig) -> Arc<DocumentBuilder> {
        let builder = self.builder.get_or_init(|| {
            let config = config();
            info!(title = %config.title, version = %config.version, "document builder created");
            Arc::new(DocumentBuilder::new(config))
        });
        Arc::clone(builder)
    }

    /// Returns the builder if it exists.
    pub fn get(&self) -> Option<Arc<DocumentBuilder>> {
        self.builder.get().cloned()
    }

    /// Whether the builder has been created.
    pub fn is_initialized(&self) -> bool {
        self.builder.get().is_some()
    }
}

impl fmt::Debug for RegistrationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationContext")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
