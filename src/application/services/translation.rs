//! Constraint translation review
//!
//! One pass per model load: the first untranslated constraint is surfaced
//! for human review. Save records the text (the empty string is a valid
//! translation), Skip leaves it absent for the rest of the session. The
//! queue never advances on its own.

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Constraint;
use crate::infrastructure::traits::{Prompter, TranslationAction};

/// What the per-load review pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Constraint at `index` was put in front of the reviewer
    Reviewed {
        index: usize,
        action: TranslationAction,
    },
    /// Every constraint already carries a translation
    NothingPending,
    /// The single per-load pass has already run
    AlreadyReviewed,
}

/// Finite review queue with a one-shot cursor.
///
/// Constructed fresh per successful model load, alongside the rest of the
/// session state.
#[derive(Debug, Default)]
pub struct TranslationQueue {
    fired: bool,
}

impl TranslationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// First constraint, in payload order, without a translation.
    pub fn next_untranslated(constraints: &[Constraint]) -> Option<usize> {
        constraints.iter().position(|c| !c.is_translated())
    }

    /// Applies the reviewer's decision to one constraint.
    pub fn resolve(constraints: &mut [Constraint], index: usize, action: &TranslationAction) {
        if let Some(constraint) = constraints.get_mut(index) {
            match action {
                TranslationAction::Save(text) => constraint.translation = Some(text.clone()),
                TranslationAction::Skip => {}
            }
        }
    }

    /// Runs the per-load review pass: at most one prompt, ever.
    #[instrument(level = "debug", skip_all)]
    pub fn review_once(
        &mut self,
        constraints: &mut [Constraint],
        prompter: &dyn Prompter,
    ) -> ApplicationResult<ReviewOutcome> {
        if self.fired {
            return Ok(ReviewOutcome::AlreadyReviewed);
        }
        self.fired = true;

        let Some(index) = Self::next_untranslated(constraints) else {
            debug!("review: all constraints translated");
            return Ok(ReviewOutcome::NothingPending);
        };

        let action =
            prompter
                .review(&constraints[index])
                .map_err(|e| ApplicationError::OperationFailed {
                    context: "constraint review prompt".to_string(),
                    source: Box::new(e),
                })?;
        Self::resolve(constraints, index, &action);
        debug!("review: constraint {index} resolved with {action:?}");

        Ok(ReviewOutcome::Reviewed { index, action })
    }
}
