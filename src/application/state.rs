//! Aggregate session state
//!
//! Owns the Session plus the mutable selection, expansion, and validation
//! state. A model-load event constructs a fresh AppState, which is how all
//! per-session state resets: nothing survives from one upload to the next.

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::application::services::{
    RevalidateOutcome, ReviewOutcome, TranslationQueue, ValidationCoordinator,
};
use crate::application::ApplicationResult;
use crate::domain::{is_blocked, ExpansionState, SelectionState, Session};
use crate::infrastructure::traits::{ModelBackend, Prompter};

/// Result of one user toggle, as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Selection changed; the verdict request ran (or was skipped as empty)
    Applied(RevalidateOutcome),
    /// Selection changed; the validator call failed, prior verdict kept
    AppliedValidatorUnavailable,
    /// Rejected: the feature sits in a saturated XOR group
    Blocked,
}

/// All state belonging to one loaded model.
pub struct AppState {
    pub session: Session,
    pub selection: SelectionState,
    pub expansion: ExpansionState,
    pub coordinator: ValidationCoordinator,
    pub queue: TranslationQueue,
}

impl AppState {
    /// Fresh state for a newly loaded session; all derived state resets,
    /// even when the new tree reuses names from the old one.
    pub fn new(session: Session, backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            session,
            selection: SelectionState::new(),
            expansion: ExpansionState::new(),
            coordinator: ValidationCoordinator::new(backend),
            queue: TranslationQueue::new(),
        }
    }

    /// Flips the named feature, runs the cascade, and revalidates.
    ///
    /// Unknown names are caller errors and propagate as domain errors. A
    /// validator failure keeps both the toggle and the previous verdict.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_feature(&mut self, name: &str) -> ApplicationResult<ToggleOutcome> {
        let checked = !self.selection.is_selected(name);
        if checked && is_blocked(&self.session.arena, &self.selection, name) {
            return Ok(ToggleOutcome::Blocked);
        }

        self.selection.toggle(&self.session.arena, name, checked)?;
        self.coordinator.selection_changed();

        match self.coordinator.revalidate(&self.selection.snapshot()) {
            Ok(outcome) => Ok(ToggleOutcome::Applied(outcome)),
            Err(err) => {
                warn!("validator unavailable: {err}");
                Ok(ToggleOutcome::AppliedValidatorUnavailable)
            }
        }
    }

    /// Flips a node's expansion. Presentation only; never touches the
    /// selection or the verdict.
    pub fn toggle_expansion(&mut self, name: &str) {
        self.expansion.toggle(name);
    }

    /// Per-load translation review; at most one prompt per session.
    pub fn review_translations(&mut self, prompter: &dyn Prompter) -> ApplicationResult<ReviewOutcome> {
        self.queue
            .review_once(&mut self.session.constraints, prompter)
    }
}
