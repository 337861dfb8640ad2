//! fmconf: interactive feature-model configurator
//!
//! Loads a feature-model description through an external analysis backend,
//! lets the user toggle features with cascade semantics, and reports whether
//! the selection is a valid product configuration.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
