//! Tree presentation of a session
//!
//! Renders the feature tree with selection checkboxes, group annotations,
//! and expansion-aware pruning. Mandatory features render bold; that marker
//! is purely cosmetic and never enforced by the selection cascade.

use colored::Colorize;
use generational_arena::Index;
use termtree::Tree;

use crate::domain::{is_blocked, ExpansionState, FeatureArena, SelectionState};

/// Render one tree per root, pruning children of collapsed nodes.
pub fn render_session_trees(
    arena: &FeatureArena,
    selection: &SelectionState,
    expansion: &ExpansionState,
) -> Vec<Tree<String>> {
    arena
        .roots()
        .iter()
        .map(|&root| render_node(arena, selection, Some(expansion), root))
        .collect()
}

/// Render the whole model without selection state (non-interactive views).
pub fn render_model_trees(arena: &FeatureArena) -> Vec<Tree<String>> {
    arena
        .roots()
        .iter()
        .map(|&root| render_plain(arena, root))
        .collect()
}

fn render_node(
    arena: &FeatureArena,
    selection: &SelectionState,
    expansion: Option<&ExpansionState>,
    idx: Index,
) -> Tree<String> {
    let Some(node) = arena.get(idx) else {
        return Tree::new(String::new());
    };

    let name = &node.data.name;
    let collapsed = expansion
        .map(|e| !e.is_expanded(name) && !node.children.is_empty())
        .unwrap_or(false);

    let mut label = format!("{} {}", checkbox(selection, name), styled_name(arena, idx));
    if collapsed {
        let hidden = arena.subtree(idx).count().saturating_sub(1);
        label.push_str(&format!(" {}", format!("▸ +{hidden}").dimmed()));
        return Tree::new(label);
    }
    if is_blocked(arena, selection, name) {
        label.push_str(&format!(" {}", "(locked)".dimmed()));
    }

    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|&child| render_node(arena, selection, expansion, child))
        .collect();
    Tree::new(label).with_leaves(leaves)
}

fn render_plain(arena: &FeatureArena, idx: Index) -> Tree<String> {
    let Some(node) = arena.get(idx) else {
        return Tree::new(String::new());
    };

    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|&child| render_plain(arena, child))
        .collect();
    Tree::new(styled_name(arena, idx)).with_leaves(leaves)
}

fn checkbox(selection: &SelectionState, name: &str) -> String {
    if selection.is_selected(name) {
        format!("[{}]", "x".green())
    } else {
        "[ ]".to_string()
    }
}

/// Feature name with mandatory emphasis and group annotation.
fn styled_name(arena: &FeatureArena, idx: Index) -> String {
    let Some(node) = arena.get(idx) else {
        return String::new();
    };

    let mut name = if node.data.mandatory {
        node.data.name.bold().to_string()
    } else {
        node.data.name.clone()
    };
    if let Some(group) = node.data.group.label() {
        name.push_str(&format!(" {}", format!("({group})").dimmed()));
    }
    name
}
