//! Domain entities: core data structures

use uuid::Uuid;

use crate::domain::arena::FeatureArena;

/// Grouping a feature participates in under its parent.
///
/// The upload payload carries the tag on the group-heading parent; ingest
/// pushes it down so each sibling knows which group it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Group {
    /// Exactly one sibling of the group may be selected
    Xor,
    /// At least one sibling of the group must be selected
    Or,
    And,
    #[default]
    None,
}

impl Group {
    /// Parse a payload tag (case-insensitive). Unknown tags are rejected.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "XOR" => Some(Group::Xor),
            "OR" => Some(Group::Or),
            "AND" => Some(Group::And),
            _ => None,
        }
    }

    /// Short display label, None for ungrouped features.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Group::Xor => Some("xor"),
            Group::Or => Some("or"),
            Group::And => Some("and"),
            Group::None => None,
        }
    }
}

/// Classification of a cross-tree constraint, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Requires,
    Excludes,
}

/// One unit of the translation review queue.
///
/// Created by the upload response. Only the human reviewer sets
/// `translation`; constraints are never deleted within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub english_statement: String,
    pub kind: Option<ConstraintKind>,
    pub translation: Option<String>,
}

impl Constraint {
    pub fn new(english_statement: impl Into<String>, kind: Option<ConstraintKind>) -> Self {
        Self {
            english_statement: english_statement.into(),
            kind,
            translation: None,
        }
    }

    /// The empty string counts as a translation; only absence is pending.
    pub fn is_translated(&self) -> bool {
        self.translation.is_some()
    }
}

/// Verdict from the external validator for one selection snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    /// Validator messages, rendered verbatim to the user
    pub messages: Vec<String>,
}

/// Aggregate returned by the upload step.
///
/// Exclusively owned by the current view and replaced wholesale by the next
/// upload; nothing in here is partially mutated across loads.
#[derive(Debug)]
pub struct Session {
    /// Correlation id for logs, fresh per upload
    pub id: Uuid,
    pub arena: FeatureArena,
    pub logic_rules: Vec<String>,
    /// Minimum working products: sets of feature names
    pub mwps: Vec<Vec<String>>,
    pub constraints: Vec<Constraint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("XOR", Some(Group::Xor))]
    #[case("xor", Some(Group::Xor))]
    #[case("OR", Some(Group::Or))]
    #[case("AND", Some(Group::And))]
    #[case("MAYBE", None)]
    #[case("", None)]
    fn test_group_from_tag(#[case] tag: &str, #[case] expected: Option<Group>) {
        assert_eq!(Group::from_tag(tag), expected);
    }

    #[test]
    fn given_empty_string_translation_then_constraint_counts_as_translated() {
        let mut constraint = Constraint::new("A requires B", Some(ConstraintKind::Requires));
        assert!(!constraint.is_translated());

        constraint.translation = Some(String::new());

        assert!(constraint.is_translated());
    }
}
