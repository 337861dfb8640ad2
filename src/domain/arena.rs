use generational_arena::{Arena, Index};
use std::collections::HashMap;
use std::fmt;
use tracing::instrument;

use crate::domain::entities::Group;
use crate::domain::error::{DomainError, DomainResult};

/// Data payload for tree nodes representing model features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureData {
    /// Unique name, the lookup key everywhere
    pub name: String,
    /// Display marker only; the cascade never enforces it
    pub mandatory: bool,
    /// Group this feature belongs to under its parent
    pub group: Group,
}

impl fmt::Display for FeatureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based feature hierarchy.
#[derive(Debug)]
pub struct FeatureNode {
    pub data: FeatureData,
    /// Index of parent node in the arena, None for root features
    pub parent: Option<Index>,
    /// Indices of child nodes, in payload order
    pub children: Vec<Index>,
}

/// Arena-based feature tree with name lookups.
///
/// Uses generational arena for memory-safe node references plus a
/// name-to-index map for O(1) lookups. One arena represents one uploaded
/// feature model and is immutable after construction.
#[derive(Debug)]
pub struct FeatureArena {
    arena: Arena<FeatureNode>,
    roots: Vec<Index>,
    by_name: HashMap<String, Index>,
}

impl Default for FeatureArena {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Inserts a node, registering it with its parent and the name map.
    ///
    /// Feature names are the lookup key everywhere, so duplicates across the
    /// whole tree are rejected.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: FeatureData, parent: Option<Index>) -> DomainResult<Index> {
        if self.by_name.contains_key(&data.name) {
            return Err(DomainError::DuplicateFeature(data.name));
        }
        let name = data.name.clone();
        let node_idx = self.arena.insert(FeatureNode {
            data,
            parent,
            children: Vec::new(),
        });

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        self.by_name.insert(name, node_idx);
        Ok(node_idx)
    }

    pub fn get(&self, idx: Index) -> Option<&FeatureNode> {
        self.arena.get(idx)
    }

    /// Index of the feature with the given name, if present.
    pub fn lookup(&self, name: &str) -> Option<Index> {
        self.by_name.get(name).copied()
    }

    /// Index lookup that treats absence as a precondition violation.
    pub fn index_of(&self, name: &str) -> DomainResult<Index> {
        self.lookup(name)
            .ok_or_else(|| DomainError::UnknownFeature(name.to_string()))
    }

    pub fn node(&self, name: &str) -> DomainResult<&FeatureNode> {
        let idx = self.index_of(name)?;
        self.get(idx)
            .ok_or_else(|| DomainError::UnknownFeature(name.to_string()))
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Name of the node's parent, None for roots.
    pub fn parent_name(&self, idx: Index) -> Option<&str> {
        let parent_idx = self.get(idx)?.parent?;
        self.get(parent_idx).map(|n| n.data.name.as_str())
    }

    /// Other children of the node's parent; roots have no siblings.
    pub fn siblings(&self, idx: Index) -> Vec<Index> {
        let Some(node) = self.get(idx) else {
            return Vec::new();
        };
        let Some(parent_idx) = node.parent else {
            return Vec::new();
        };
        let Some(parent) = self.get(parent_idx) else {
            return Vec::new();
        };
        parent
            .children
            .iter()
            .copied()
            .filter(|&c| c != idx)
            .collect()
    }

    /// Preorder traversal over all roots, in payload order.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::from_roots(self, &self.roots)
    }

    /// Preorder traversal of one subtree, including the start node.
    #[instrument(level = "trace", skip(self))]
    pub fn subtree(&self, start: Index) -> TreeIterator {
        TreeIterator::from_roots(self, &[start])
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a FeatureArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn from_roots(arena: &'a FeatureArena, roots: &[Index]) -> Self {
        // Push in reverse so the first root is popped first
        let stack = roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a FeatureNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
