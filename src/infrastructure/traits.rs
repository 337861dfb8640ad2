//! I/O boundary traits for testability
//!
//! These traits abstract the analysis backend and the interactive dialogs,
//! allowing services to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::Constraint;

/// Feature node as delivered by the upload response.
///
/// The `group` tag sits on the group-heading parent; ingest pushes it down
/// onto the children. Unknown payload fields (e.g. the redundant `parent`
/// back-reference) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturePayload {
    pub name: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub children: Vec<FeaturePayload>,
}

/// Constraint as delivered by the upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintPayload {
    #[serde(rename = "englishStatement")]
    pub english_statement: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Complete upload response: one analysis session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionPayload {
    pub features: Vec<FeaturePayload>,
    #[serde(rename = "logicRules", default)]
    pub logic_rules: Vec<String>,
    #[serde(default)]
    pub mwps: Vec<Vec<String>>,
    #[serde(default)]
    pub constraints: Vec<ConstraintPayload>,
}

/// Validator response for one candidate selection.
#[derive(Debug, Clone, Deserialize)]
pub struct VerdictPayload {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Structured error body the backend sends on failure.
#[derive(Debug, Clone, Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Errors crossing the backend boundary.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend reported a structured, human-readable error
    #[error("{message}")]
    Service { message: String },

    #[error("backend unreachable: {context}")]
    Transport {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("malformed backend response: {context}")]
    Decode {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Analysis backend abstraction (upload + validate).
pub trait ModelBackend: Send + Sync {
    /// Upload one model description file, returning the session payload.
    fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<SessionPayload, BackendError>;

    /// Ask the validator to judge a candidate selection.
    fn validate(&self, selected: &[String]) -> Result<VerdictPayload, BackendError>;
}

/// Item for FZF-style selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    /// Display text shown in selector
    pub display: String,
    /// Actual value (e.g., an encoded action)
    pub value: String,
}

/// Interactive FZF-style selector abstraction.
pub trait Selector: Send + Sync {
    /// Present items to user and return selected one.
    /// Returns None if user cancels (Esc/Ctrl-C).
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String>;
}

/// Reviewer decision for one constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationAction {
    /// Record the given text (the empty string is a valid translation)
    Save(String),
    /// Leave the translation absent for the rest of the session
    Skip,
}

/// Interactive translation dialog abstraction.
pub trait Prompter: Send + Sync {
    /// Present one constraint for review. Blocks until the reviewer decides.
    fn review(&self, constraint: &Constraint) -> io::Result<TranslationAction>;
}

/// Editor abstraction for opening files.
pub trait Editor: Send + Sync {
    /// Open a file in the editor.
    /// Blocks until editor exits.
    fn open(&self, path: &Path) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// HTTP implementation of the analysis backend.
///
/// One blocking request at a time; the client timeout maps expiry to the
/// same failure path as any other transport error.
#[derive(Debug, Clone)]
pub struct HttpModelBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpModelBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("fmconf/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport {
                context: "build http client".to_string(),
                source: Box::new(e),
            })?;
        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Decode a response, mapping non-success bodies to structured errors
    /// where the backend supplied one.
    fn decode<T: DeserializeOwned>(
        context: &str,
        response: reqwest::blocking::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().map_err(|e| BackendError::Decode {
                context: context.to_string(),
                source: Box::new(e),
            });
        }
        match response.json::<ErrorPayload>() {
            Ok(body) => Err(BackendError::Service {
                message: body.error,
            }),
            Err(e) => Err(BackendError::Transport {
                context: format!("{context}: http status {status}"),
                source: Box::new(e),
            }),
        }
    }
}

impl ModelBackend for HttpModelBackend {
    fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<SessionPayload, BackendError> {
        debug!("upload: {} ({} bytes)", file_name, content.len());
        let part = reqwest::blocking::multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("application/xml")
            .map_err(|e| BackendError::Transport {
                context: "build multipart form".to_string(),
                source: Box::new(e),
            })?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .map_err(|e| BackendError::Transport {
                context: "upload request".to_string(),
                source: Box::new(e),
            })?;
        Self::decode("upload response", response)
    }

    fn validate(&self, selected: &[String]) -> Result<VerdictPayload, BackendError> {
        debug!("validate: {} features", selected.len());
        let body = serde_json::json!({ "selectedFeatures": selected });
        let response = self
            .client
            .post(self.endpoint("validate"))
            .json(&body)
            .send()
            .map_err(|e| BackendError::Transport {
                context: "validate request".to_string(),
                source: Box::new(e),
            })?;
        Self::decode("validate response", response)
    }
}

/// Real selector implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimSelector;

impl Selector for SkimSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(None);
        }

        // Build input as newline-separated display strings
        let input = items
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt))
            .height(Some("60%"))
            .multi(false)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        let output = Skim::run_with(&options, Some(items_arc));

        match output {
            Some(out) if out.is_abort => Ok(None),
            Some(out) => {
                if let Some(selected) = out.selected_items.first() {
                    let display = selected.output().to_string();
                    // Find the matching item
                    let item = items.iter().find(|i| i.display == display).cloned();
                    Ok(item)
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }
}

/// Console prompter reading the reviewer's decision from stdin.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn review(&self, constraint: &Constraint) -> io::Result<TranslationAction> {
        use std::io::{BufRead, Write};

        let stdin = io::stdin();
        let mut out = io::stdout();
        writeln!(out, "Constraint without a propositional translation:")?;
        writeln!(out, "  {}", constraint.english_statement)?;
        write!(out, "Provide one now? [y/N] ")?;
        out.flush()?;

        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            return Ok(TranslationAction::Skip);
        }

        write!(out, "Translation: ")?;
        out.flush()?;
        let mut text = String::new();
        stdin.lock().read_line(&mut text)?;
        Ok(TranslationAction::Save(
            text.trim_end_matches(['\n', '\r']).to_string(),
        ))
    }
}

/// Real editor implementation running the configured command.
#[derive(Debug)]
pub struct SystemEditor {
    command: String,
}

impl SystemEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Editor for SystemEditor {
    fn open(&self, path: &Path) -> io::Result<()> {
        use std::process::Command;

        let status = Command::new(&self.command).arg(path).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "editor exited with status: {}",
                status
            )))
        }
    }
}
