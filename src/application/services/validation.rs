//! Selection validation coordinator
//!
//! Forwards the candidate selection to the external validator and keeps the
//! latest verdict. Every request is tagged with the selection generation it
//! was computed for; responses for superseded selections are discarded
//! (latest wins). A failed call leaves the previous verdict untouched:
//! stale-but-visible beats losing feedback entirely.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::ValidationVerdict;
use crate::infrastructure::traits::ModelBackend;

/// Verdict plus the request context it was computed from.
#[derive(Debug, Clone)]
pub struct StoredVerdict {
    pub verdict: ValidationVerdict,
    /// Selection generation the verdict belongs to
    pub generation: u64,
    /// The materialized selection that was judged
    pub snapshot: Vec<String>,
    pub checked_at: DateTime<Utc>,
}

/// What became of one revalidation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevalidateOutcome {
    /// Verdict stored as current
    Stored,
    /// Empty selection: designed no-op, no backend call, verdict unchanged
    SkippedEmpty,
    /// Response arrived for a superseded selection and was dropped
    Discarded,
}

/// Coordinates revalidation after selection changes.
pub struct ValidationCoordinator {
    backend: Arc<dyn ModelBackend>,
    generation: u64,
    current: Option<StoredVerdict>,
}

impl ValidationCoordinator {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            backend,
            generation: 0,
            current: None,
        }
    }

    /// Marks the selection as changed. In-flight responses tagged with an
    /// earlier generation will be discarded on arrival.
    pub fn selection_changed(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The most recent verdict that survived the latest-wins policy.
    pub fn current(&self) -> Option<&StoredVerdict> {
        self.current.as_ref()
    }

    pub fn reset(&mut self) {
        self.generation = 0;
        self.current = None;
    }

    /// Sends the selection to the validator and stores the verdict.
    ///
    /// An empty selection is not meaningfully validatable: no network call,
    /// no verdict change. On error the previous verdict is preserved and the
    /// error propagates for generic surfacing.
    #[instrument(level = "debug", skip(self))]
    pub fn revalidate(&mut self, snapshot: &[String]) -> ApplicationResult<RevalidateOutcome> {
        if snapshot.is_empty() {
            debug!("revalidate: empty selection, skipping");
            return Ok(RevalidateOutcome::SkippedEmpty);
        }

        let tag = self.generation;
        let payload =
            self.backend
                .validate(snapshot)
                .map_err(|e| ApplicationError::ValidationFailed {
                    source: Box::new(e),
                })?;
        let verdict = ValidationVerdict {
            is_valid: payload.is_valid,
            messages: payload.messages,
        };

        if self.accept(tag, snapshot.to_vec(), verdict) {
            Ok(RevalidateOutcome::Stored)
        } else {
            Ok(RevalidateOutcome::Discarded)
        }
    }

    /// Latest-wins: stores the verdict only if `tag` still matches the
    /// current generation. Returns false when the response was discarded.
    pub fn accept(&mut self, tag: u64, snapshot: Vec<String>, verdict: ValidationVerdict) -> bool {
        if tag != self.generation {
            warn!(
                "discarding stale verdict for generation {tag} (current {})",
                self.generation
            );
            return false;
        }
        self.current = Some(StoredVerdict {
            verdict,
            generation: tag,
            snapshot,
            checked_at: Utc::now(),
        });
        true
    }
}
