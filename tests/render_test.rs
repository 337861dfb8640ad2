//! Tests for expansion-aware tree rendering

use fmconf::cli::render::{render_model_trees, render_session_trees};
use fmconf::domain::{ExpansionState, FeatureArena, FeatureData, Group, SelectionState};

fn feature(name: &str, mandatory: bool, group: Group) -> FeatureData {
    FeatureData {
        name: name.to_string(),
        mandatory,
        group,
    }
}

/// Root
/// └── Storage
///     ├── Local (xor)
///     └── Cloud (xor)
fn demo_arena() -> FeatureArena {
    let mut arena = FeatureArena::new();
    let root = arena
        .insert_node(feature("Root", false, Group::None), None)
        .unwrap();
    let storage = arena
        .insert_node(feature("Storage", false, Group::None), Some(root))
        .unwrap();
    arena
        .insert_node(feature("Local", false, Group::Xor), Some(storage))
        .unwrap();
    arena
        .insert_node(feature("Cloud", true, Group::Xor), Some(storage))
        .unwrap();
    arena
}

fn session_output(
    arena: &FeatureArena,
    selection: &SelectionState,
    expansion: &ExpansionState,
) -> String {
    colored::control::set_override(false);
    render_session_trees(arena, selection, expansion)
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[test]
fn given_collapsed_root_when_rendering_then_children_hidden() {
    let arena = demo_arena();
    let output = session_output(&arena, &SelectionState::new(), &ExpansionState::new());

    assert!(output.contains("Root"));
    assert!(!output.contains("Storage"));
    assert!(output.contains("+3"), "hidden descendant count shown: {output}");
}

#[test]
fn given_expanded_root_when_rendering_then_direct_children_visible() {
    let arena = demo_arena();
    let mut expansion = ExpansionState::new();
    expansion.toggle("Root");

    let output = session_output(&arena, &SelectionState::new(), &expansion);

    assert!(output.contains("Storage"));
    // Storage itself stays collapsed, so its children remain unreachable.
    assert!(!output.contains("Local"));
}

#[test]
fn given_fully_expanded_tree_when_rendering_then_all_nodes_visible() {
    let arena = demo_arena();
    let mut expansion = ExpansionState::new();
    expansion.toggle("Root");
    expansion.toggle("Storage");

    let output = session_output(&arena, &SelectionState::new(), &expansion);

    assert!(output.contains("Local"));
    assert!(output.contains("Cloud"));
    assert!(output.contains("(xor)"));
}

#[test]
fn given_selected_feature_when_rendering_then_checkbox_marked() {
    let arena = demo_arena();
    let mut selection = SelectionState::new();
    selection.toggle(&arena, "Storage", true).unwrap();
    let mut expansion = ExpansionState::new();
    expansion.toggle("Root");

    let output = session_output(&arena, &selection, &expansion);

    assert!(output.contains("[x] Storage"));
    assert!(output.contains("[x] Root"));
}

#[test]
fn given_saturated_xor_group_when_rendering_then_locked_marker_shown() {
    let arena = demo_arena();
    let mut selection = SelectionState::new();
    selection.toggle(&arena, "Local", true).unwrap();
    let mut expansion = ExpansionState::new();
    expansion.toggle("Root");
    expansion.toggle("Storage");

    let output = session_output(&arena, &selection, &expansion);

    assert!(output.contains("Cloud (xor) (locked)"));
    assert!(!output.contains("Local (xor) (locked)"));
}

#[test]
fn given_model_view_when_rendering_then_whole_tree_without_checkboxes() {
    colored::control::set_override(false);
    let arena = demo_arena();

    let output: String = render_model_trees(&arena)
        .iter()
        .map(|t| t.to_string())
        .collect();

    assert!(output.contains("Root"));
    assert!(output.contains("Local"));
    assert!(!output.contains("[ ]"));
}
