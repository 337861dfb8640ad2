//! Domain layer: feature-model entities and selection logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config
//! loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod expansion;
pub mod selection;

pub use arena::{FeatureArena, FeatureData, FeatureNode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use expansion::ExpansionState;
pub use selection::{is_blocked, SelectionState};
