//! Application services
//!
//! Concrete service implementations that orchestrate domain logic. Services
//! depend on I/O boundary traits (ModelBackend, Prompter) but are themselves
//! concrete structs, not traits.

mod session;
mod translation;
mod validation;

pub use session::SessionService;
pub use translation::{ReviewOutcome, TranslationQueue};
pub use validation::{RevalidateOutcome, StoredVerdict, ValidationCoordinator};
