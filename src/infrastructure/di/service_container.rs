//! Service container for dependency injection
//!
//! Wires up the editor with its settings and id generator.

use std::sync::Arc;

use crate::application::services::ColumnEditor;
use crate::config::{IdStyle, Settings};
use crate::infrastructure::traits::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};

/// Container holding application services and their collaborators.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Column id source
    pub ids: Arc<dyn IdGenerator>,
}

impl ServiceContainer {
    /// Create a new service container with the id generator chosen by settings.
    pub fn new(settings: Settings) -> Self {
        let ids: Arc<dyn IdGenerator> = match settings.id_style {
            IdStyle::Random => Arc::new(RandomIdGenerator::new(settings.id_length)),
            IdStyle::Sequential => Arc::new(SequentialIdGenerator::default()),
        };
        Self::with_deps(settings, ids)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            settings: Arc::new(settings),
            ids,
        }
    }

    /// Editor on a freshly seeded forest.
    pub fn editor(&self) -> ColumnEditor {
        ColumnEditor::new(self.settings.clone(), self.ids.clone())
    }
}
