//! Expansion state for tree rendering
//!
//! Purely presentational: no invariant ties it to the selection.

use std::collections::BTreeSet;

/// The set of tree nodes currently expanded in the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership. No validation, no cascade: collapsing a parent
    /// keeps descendants' membership, they just become unreachable in
    /// rendering until the parent is re-expanded.
    pub fn toggle(&mut self, name: &str) {
        if !self.expanded.remove(name) {
            self.expanded.insert(name.to_string());
        }
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_node_when_toggled_twice_then_back_to_collapsed() {
        let mut expansion = ExpansionState::new();
        expansion.toggle("Root");
        assert!(expansion.is_expanded("Root"));
        expansion.toggle("Root");
        assert!(!expansion.is_expanded("Root"));
    }

    #[test]
    fn given_expanded_child_when_parent_collapses_then_child_membership_kept() {
        let mut expansion = ExpansionState::new();
        expansion.toggle("Root");
        expansion.toggle("Child");
        expansion.toggle("Root");

        // The child stays expanded; it is merely unreachable in rendering.
        assert!(expansion.is_expanded("Child"));
        assert!(!expansion.is_expanded("Root"));
    }
}
