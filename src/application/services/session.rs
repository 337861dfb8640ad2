//! Model upload service
//!
//! Checks the model file, sends it to the analysis backend, and maps the
//! payload into a domain Session.

use std::path::Path;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    Constraint, ConstraintKind, DomainError, FeatureArena, FeatureData, Group, Session,
};
use crate::infrastructure::traits::{BackendError, FeaturePayload, ModelBackend, SessionPayload};

/// Service for loading model descriptions into sessions.
pub struct SessionService {
    backend: Arc<dyn ModelBackend>,
}

impl SessionService {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Uploads a model file and builds a fresh Session.
    ///
    /// Input errors (missing file, wrong extension) never reach the backend.
    /// On failure the caller keeps whatever session it had before.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path, expected_ext: &str) -> ApplicationResult<Session> {
        if !path.is_file() {
            return Err(ApplicationError::FileNotFound(path.to_path_buf()));
        }
        let ext_ok = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case(expected_ext))
            .unwrap_or(false);
        if !ext_ok {
            return Err(ApplicationError::UnsupportedFileType {
                path: path.to_path_buf(),
                expected: expected_ext.to_string(),
            });
        }

        let content = std::fs::read(path).map_err(|e| ApplicationError::OperationFailed {
            context: format!("read model file {}", path.display()),
            source: Box::new(e),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "model.xml".to_string());

        let payload = self
            .backend
            .upload(&file_name, content)
            .map_err(map_upload_error)?;

        let session = build_session(payload)?;
        debug!(
            "load: session {} with {} features, {} rules, {} constraints",
            session.id,
            session.arena.len(),
            session.logic_rules.len(),
            session.constraints.len()
        );
        Ok(session)
    }
}

/// Structured backend messages pass through; anything else collapses to the
/// generic upload failure, with the detail kept in the log.
fn map_upload_error(err: BackendError) -> ApplicationError {
    match err {
        BackendError::Service { message } => ApplicationError::UploadFailed { message },
        other => {
            warn!("upload failed: {other}");
            ApplicationError::UploadFailed {
                message: "upload failed".to_string(),
            }
        }
    }
}

/// Maps the backend payload into the domain model.
fn build_session(payload: SessionPayload) -> ApplicationResult<Session> {
    let arena = build_arena(&payload.features)?;
    let constraints = payload
        .constraints
        .into_iter()
        .map(|c| Constraint::new(c.english_statement, c.kind.as_deref().and_then(parse_kind)))
        .collect();

    Ok(Session {
        id: Uuid::new_v4(),
        arena,
        logic_rules: payload.logic_rules,
        mwps: payload.mwps,
        constraints,
    })
}

fn parse_kind(tag: &str) -> Option<ConstraintKind> {
    match tag {
        "requires" => Some(ConstraintKind::Requires),
        "excludes" => Some(ConstraintKind::Excludes),
        _ => None,
    }
}

/// Builds the arena via an explicit stack walk over the payload tree.
///
/// The payload carries the group tag on the group-heading parent; it is
/// pushed down here so each child knows the group it belongs to.
fn build_arena(roots: &[FeaturePayload]) -> ApplicationResult<FeatureArena> {
    if roots.is_empty() {
        return Err(DomainError::EmptyModel.into());
    }

    let mut arena = FeatureArena::new();
    let mut stack: Vec<(&FeaturePayload, Option<Index>, Group)> =
        roots.iter().rev().map(|f| (f, None, Group::None)).collect();

    while let Some((feature, parent, group)) = stack.pop() {
        let data = FeatureData {
            name: feature.name.clone(),
            mandatory: feature.mandatory,
            group,
        };
        let idx = arena.insert_node(data, parent)?;

        let child_group = match &feature.group {
            Some(tag) => Group::from_tag(tag).ok_or_else(|| DomainError::InvalidGroup {
                feature: feature.name.clone(),
                tag: tag.clone(),
            })?,
            None => Group::None,
        };
        // Reverse keeps payload order under the explicit stack
        for child in feature.children.iter().rev() {
            stack.push((child, Some(idx), child_group));
        }
    }

    Ok(arena)
}
