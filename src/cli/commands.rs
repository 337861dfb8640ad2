//! Command dispatch and the interactive session loop

use std::path::Path;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{ReviewOutcome, RevalidateOutcome};
use crate::application::{AppState, ApplicationError, ToggleOutcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{render_model_trees, render_session_trees};
use crate::config::{global_config_path, Settings};
use crate::domain::{SelectionState, Session};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{SelectionItem, TranslationAction};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings)?;

    match command {
        Commands::Session { file } => _session(&container, file),
        Commands::Tree { file } => _tree(&container, file),
        Commands::Rules { file } => _rules(&container, file),
        Commands::Mwps { file } => _mwps(&container, file),
        Commands::Validate { file, features } => _validate(&container, file, features),
        Commands::Config { command } => _config(&container, command),
    }
}

fn load_session(container: &ServiceContainer, file: &Path) -> CliResult<Session> {
    let session = container
        .session_service()
        .load(file, &container.settings.model_extension)?;
    Ok(session)
}

#[instrument(skip(container))]
fn _session(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let session = load_session(container, file)?;
    output::success(&format!(
        "Loaded model: {} features, {} rules, {} MWPs",
        session.arena.len(),
        session.logic_rules.len(),
        session.mwps.len()
    ));

    let mut state = AppState::new(session, container.backend.clone());

    match state.review_translations(container.prompter.as_ref())? {
        ReviewOutcome::Reviewed {
            action: TranslationAction::Save(_),
            ..
        } => output::success("translation saved"),
        ReviewOutcome::Reviewed {
            action: TranslationAction::Skip,
            ..
        } => output::detail("translation skipped for this session"),
        ReviewOutcome::NothingPending | ReviewOutcome::AlreadyReviewed => {}
    }

    loop {
        print_view(&state);

        let items = menu_items(&state);
        let choice = container
            .selector
            .select_one(&items, "fmconf> ")
            .map_err(|e| InfraError::Dialog { message: e })?;
        let Some(choice) = choice else {
            break;
        };

        match choice.value.split_once(':') {
            Some(("toggle", name)) => match state.toggle_feature(name)? {
                ToggleOutcome::Blocked => {
                    output::warning(&format!("{name} is locked by its XOR group"))
                }
                ToggleOutcome::Applied(RevalidateOutcome::SkippedEmpty) => {
                    output::detail("selection is empty, nothing to validate")
                }
                ToggleOutcome::Applied(_) => {}
                ToggleOutcome::AppliedValidatorUnavailable => output::warning("validation failed"),
            },
            Some(("expand", name)) => state.toggle_expansion(name),
            _ => match choice.value.as_str() {
                "rules" => print_rules(&state.session),
                "mwps" => print_mwps(&state.session),
                "status" => print_verdict(&state),
                "quit" => break,
                other => debug!("ignoring unknown menu value: {other}"),
            },
        }
    }

    Ok(())
}

/// Menu entries for the interactive loop: one checkbox row per visible
/// feature, an expand/collapse row per visible feature with children, then
/// the control actions. Collapsed subtrees are unreachable until re-expanded.
fn menu_items(state: &AppState) -> Vec<SelectionItem> {
    let arena = &state.session.arena;
    let mut items = Vec::new();

    let mut stack: Vec<(Index, usize)> = arena.roots().iter().rev().map(|&r| (r, 0)).collect();
    while let Some((idx, depth)) = stack.pop() {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        let name = &node.data.name;
        let indent = "  ".repeat(depth);
        let marker = if state.selection.is_selected(name) {
            "[x]"
        } else {
            "[ ]"
        };
        items.push(SelectionItem {
            display: format!("{indent}{marker} {name}"),
            value: format!("toggle:{name}"),
        });

        if !node.children.is_empty() {
            let expanded = state.expansion.is_expanded(name);
            let verb = if expanded { "collapse" } else { "expand" };
            items.push(SelectionItem {
                display: format!("{indent}    {verb} {name}"),
                value: format!("expand:{name}"),
            });
            if expanded {
                for &child in node.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
    }

    for (display, value) in [
        ("-- validation status", "status"),
        ("-- logic rules", "rules"),
        ("-- minimum working products", "mwps"),
        ("-- quit", "quit"),
    ] {
        items.push(SelectionItem {
            display: display.to_string(),
            value: value.to_string(),
        });
    }
    items
}

fn print_view(state: &AppState) {
    output::header("Features");
    for tree in render_session_trees(&state.session.arena, &state.selection, &state.expansion) {
        print!("{tree}");
    }
    print_verdict(state);
}

fn print_verdict(state: &AppState) {
    match state.coordinator.current() {
        None => output::detail("no validation verdict yet"),
        Some(stored) => {
            if stored.verdict.is_valid {
                output::success(&format!(
                    "valid configuration ({} features)",
                    stored.snapshot.len()
                ));
            } else {
                output::failure("invalid configuration");
            }
            // Validator messages render verbatim
            for message in &stored.verdict.messages {
                output::detail(message);
            }
        }
    }
}

fn print_rules(session: &Session) {
    if session.logic_rules.is_empty() {
        output::detail("(no logic rules)");
        return;
    }
    for rule in &session.logic_rules {
        output::info(rule);
    }
}

fn print_mwps(session: &Session) {
    if session.mwps.is_empty() {
        output::detail("(no minimum working products)");
        return;
    }
    for (i, mwp) in session.mwps.iter().enumerate() {
        output::info(&format!("{}. {{{}}}", i + 1, mwp.iter().join(", ")));
    }
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let session = load_session(container, file)?;
    for tree in render_model_trees(&session.arena) {
        print!("{tree}");
    }
    Ok(())
}

#[instrument(skip(container))]
fn _rules(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let session = load_session(container, file)?;
    print_rules(&session);
    Ok(())
}

#[instrument(skip(container))]
fn _mwps(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let session = load_session(container, file)?;
    print_mwps(&session);
    Ok(())
}

#[instrument(skip(container))]
fn _validate(container: &ServiceContainer, file: &Path, features: &[String]) -> CliResult<()> {
    let session = load_session(container, file)?;

    let mut selection = SelectionState::new();
    for name in features {
        if session.arena.lookup(name).is_none() {
            return Err(CliError::InvalidArgs(format!("unknown feature: {name}")));
        }
        selection
            .toggle(&session.arena, name, true)
            .map_err(ApplicationError::from)?;
    }

    let mut coordinator = container.validation_coordinator();
    coordinator.selection_changed();
    match coordinator.revalidate(&selection.snapshot())? {
        RevalidateOutcome::SkippedEmpty => {
            output::detail("selection is empty, nothing to validate");
            return Ok(());
        }
        _ => {}
    }

    if let Some(stored) = coordinator.current() {
        if stored.verdict.is_valid {
            output::success(&format!("valid: {{{}}}", stored.snapshot.iter().join(", ")));
        } else {
            output::failure("invalid configuration");
        }
        for message in &stored.verdict.messages {
            output::detail(message);
        }
    }
    Ok(())
}

fn _config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let toml = container.settings.to_toml()?;
            output::info(&toml);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning("cannot determine config directory"),
            }
            Ok(())
        }
        ConfigCommands::Edit => {
            let path = global_config_path().ok_or_else(|| ApplicationError::Config {
                message: "cannot determine config directory".to_string(),
            })?;
            if !path.exists() {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)
                        .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
                }
                std::fs::write(&path, Settings::template())
                    .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            }
            container
                .editor
                .open(&path)
                .map_err(|e| InfraError::io(format!("edit {}", path.display()), e))?;
            Ok(())
        }
    }
}
