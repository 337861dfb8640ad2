//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{SessionService, ValidationCoordinator};
use crate::config::Settings;
use crate::infrastructure::traits::{
    ConsolePrompter, Editor, HttpModelBackend, ModelBackend, Prompter, Selector, SkimSelector,
    SystemEditor,
};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Analysis backend abstraction
    pub backend: Arc<dyn ModelBackend>,

    /// Interactive selector abstraction
    pub selector: Arc<dyn Selector>,

    /// Translation dialog abstraction
    pub prompter: Arc<dyn Prompter>,

    /// Editor abstraction
    pub editor: Arc<dyn Editor>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let backend = HttpModelBackend::new(
            &settings.backend_url,
            Duration::from_secs(settings.timeout_secs),
        )?;
        let editor = SystemEditor::new(&settings.editor);
        Ok(Self::with_deps(
            settings,
            Arc::new(backend),
            Arc::new(SkimSelector),
            Arc::new(ConsolePrompter),
            Arc::new(editor),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        backend: Arc<dyn ModelBackend>,
        selector: Arc<dyn Selector>,
        prompter: Arc<dyn Prompter>,
        editor: Arc<dyn Editor>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            backend,
            selector,
            prompter,
            editor,
        }
    }

    pub fn session_service(&self) -> SessionService {
        SessionService::new(self.backend.clone())
    }

    pub fn validation_coordinator(&self) -> ValidationCoordinator {
        ValidationCoordinator::new(self.backend.clone())
    }
}
