//! Tests for the validation coordinator: empty short-circuit, latest-wins,
//! and failure handling

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fmconf::application::services::{RevalidateOutcome, ValidationCoordinator};
use fmconf::domain::ValidationVerdict;
use fmconf::infrastructure::traits::{
    BackendError, ModelBackend, SessionPayload, VerdictPayload,
};

/// Deterministic validator double: records every call, answers with a fixed
/// verdict, and can be switched into failure mode.
struct ScriptedValidator {
    is_valid: bool,
    messages: Vec<String>,
    calls: Mutex<Vec<Vec<String>>>,
    fail: AtomicBool,
}

impl ScriptedValidator {
    fn new(is_valid: bool, messages: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            is_valid,
            messages: messages.iter().map(|m| m.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ModelBackend for ScriptedValidator {
    fn upload(&self, _file_name: &str, _content: Vec<u8>) -> Result<SessionPayload, BackendError> {
        Err(BackendError::Service {
            message: "upload not supported by this double".to_string(),
        })
    }

    fn validate(&self, selected: &[String]) -> Result<VerdictPayload, BackendError> {
        self.calls.lock().unwrap().push(selected.to_vec());
        if self.fail.load(Ordering::SeqCst) {
            return Err(BackendError::Transport {
                context: "validate request".to_string(),
                source: Box::new(std::io::Error::other("connection refused")),
            });
        }
        Ok(VerdictPayload {
            is_valid: self.is_valid,
            messages: self.messages.clone(),
        })
    }
}

fn snapshot(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn given_empty_selection_when_revalidating_then_no_call_and_no_verdict() {
    fmconf::util::testing::init_test_setup();
    let backend = ScriptedValidator::new(true, &[]);
    let mut coordinator = ValidationCoordinator::new(backend.clone());

    let outcome = coordinator.revalidate(&[]).unwrap();

    assert_eq!(outcome, RevalidateOutcome::SkippedEmpty);
    assert_eq!(backend.call_count(), 0);
    assert!(coordinator.current().is_none());
}

#[test]
fn given_selection_when_revalidating_then_verdict_stored_with_context() {
    let backend = ScriptedValidator::new(false, &["X requires Y"]);
    let mut coordinator = ValidationCoordinator::new(backend.clone());
    let generation = coordinator.selection_changed();

    let outcome = coordinator.revalidate(&snapshot(&["X"])).unwrap();

    assert_eq!(outcome, RevalidateOutcome::Stored);
    let stored = coordinator.current().expect("verdict stored");
    assert!(!stored.verdict.is_valid);
    assert_eq!(stored.verdict.messages, vec!["X requires Y".to_string()]);
    assert_eq!(stored.generation, generation);
    assert_eq!(stored.snapshot, snapshot(&["X"]));
}

#[test]
fn given_backend_failure_when_revalidating_then_prior_verdict_kept() {
    let backend = ScriptedValidator::new(true, &[]);
    let mut coordinator = ValidationCoordinator::new(backend.clone());
    coordinator.selection_changed();
    coordinator.revalidate(&snapshot(&["A"])).unwrap();
    let prior_generation = coordinator.current().unwrap().generation;

    backend.fail.store(true, Ordering::SeqCst);
    coordinator.selection_changed();
    let result = coordinator.revalidate(&snapshot(&["A", "B"]));

    assert!(result.is_err());
    let stored = coordinator.current().expect("stale verdict still visible");
    assert_eq!(stored.generation, prior_generation);
    assert_eq!(stored.snapshot, snapshot(&["A"]));
}

#[test]
fn given_stale_tag_when_accepting_then_response_discarded() {
    let backend = ScriptedValidator::new(true, &[]);
    let mut coordinator = ValidationCoordinator::new(backend);
    let stale = coordinator.selection_changed();
    let current = coordinator.selection_changed();

    let verdict = ValidationVerdict {
        is_valid: true,
        messages: vec![],
    };
    assert!(!coordinator.accept(stale, snapshot(&["A"]), verdict.clone()));
    assert!(coordinator.current().is_none());

    // The response matching the current selection wins.
    assert!(coordinator.accept(current, snapshot(&["A", "B"]), verdict));
    assert_eq!(coordinator.current().unwrap().snapshot, snapshot(&["A", "B"]));
}

#[test]
fn given_unchanged_selection_when_revalidating_twice_then_same_verdict() {
    let backend = ScriptedValidator::new(true, &["all good"]);
    let mut coordinator = ValidationCoordinator::new(backend.clone());
    coordinator.selection_changed();

    coordinator.revalidate(&snapshot(&["A"])).unwrap();
    let first = coordinator.current().unwrap().verdict.clone();
    coordinator.revalidate(&snapshot(&["A"])).unwrap();
    let second = coordinator.current().unwrap().verdict.clone();

    assert_eq!(first, second);
    assert_eq!(backend.call_count(), 2);
}

#[test]
fn given_verdict_when_reset_then_everything_cleared() {
    let backend = ScriptedValidator::new(true, &[]);
    let mut coordinator = ValidationCoordinator::new(backend);
    coordinator.selection_changed();
    coordinator.revalidate(&snapshot(&["A"])).unwrap();

    coordinator.reset();

    assert!(coordinator.current().is_none());
    assert_eq!(coordinator.generation(), 0);
}
