//! Selection state and the toggle cascade
//!
//! The candidate configuration is a set of feature names. Toggling cascades:
//! selecting pulls in the direct parent and evicts XOR siblings, deselecting
//! clears the entire subtree.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::domain::arena::FeatureArena;
use crate::domain::entities::Group;
use crate::domain::error::DomainResult;

/// The set of currently selected feature names.
///
/// Derived data: fully replaced on every model load. Invariant: every name
/// in the set resolves in the current arena (guarded by the `toggle`
/// precondition; there is no other mutation path).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Ordered materialization of the candidate configuration.
    pub fn snapshot(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Applies one toggle with its cascade.
    ///
    /// Selecting adds the feature and its direct parent (one level only, not
    /// the full ancestor chain) and evicts XOR siblings together with their
    /// subtrees. Deselecting removes the feature and every descendant.
    ///
    /// Atomic from the caller's perspective: a precondition violation
    /// (unknown feature) leaves the selection untouched.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn toggle(&mut self, arena: &FeatureArena, name: &str, checked: bool) -> DomainResult<()> {
        let idx = arena.index_of(name)?;

        if checked {
            self.selected.insert(name.to_string());
            if let Some(node) = arena.get(idx) {
                if let Some(parent_idx) = node.parent {
                    if let Some(parent) = arena.get(parent_idx) {
                        self.selected.insert(parent.data.name.clone());
                    }
                }
                if node.data.group == Group::Xor {
                    for sibling in arena.siblings(idx) {
                        let in_xor_group = arena
                            .get(sibling)
                            .is_some_and(|n| n.data.group == Group::Xor);
                        if in_xor_group {
                            self.remove_subtree(arena, sibling);
                        }
                    }
                }
            }
        } else {
            self.remove_subtree(arena, idx);
        }

        Ok(())
    }

    /// Removes the node and all descendants via an explicit stack walk.
    fn remove_subtree(&mut self, arena: &FeatureArena, start: generational_arena::Index) {
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if let Some(node) = arena.get(idx) {
                self.selected.remove(&node.data.name);
                for &child in &node.children {
                    stack.push(child);
                }
            }
        }
    }
}

/// Whether a new selection attempt on `name` must be rejected.
///
/// True iff the feature sits in an XOR group, its parent is selected, and
/// another member of that group is already selected. Pure function of
/// (tree, selection): recomputed on demand, never cached.
pub fn is_blocked(arena: &FeatureArena, selection: &SelectionState, name: &str) -> bool {
    let Some(idx) = arena.lookup(name) else {
        return false;
    };
    let Some(node) = arena.get(idx) else {
        return false;
    };
    if node.data.group != Group::Xor {
        return false;
    }
    let Some(parent_idx) = node.parent else {
        return false;
    };
    let parent_selected = arena
        .get(parent_idx)
        .is_some_and(|p| selection.is_selected(&p.data.name));
    if !parent_selected {
        return false;
    }
    arena.siblings(idx).into_iter().any(|sibling| {
        arena
            .get(sibling)
            .is_some_and(|n| n.data.group == Group::Xor && selection.is_selected(&n.data.name))
    })
}
