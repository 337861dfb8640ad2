//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/fmconf/fmconf.toml`
//! 3. Environment variables: `FMCONF_*` prefix

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for fmconf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the analysis backend
    pub backend_url: String,
    /// Timeout for backend requests, in seconds
    pub timeout_secs: u64,
    /// File extension accepted for model descriptions
    pub model_extension: String,
    /// Editor command (default: $VISUAL, $EDITOR, or "vim")
    pub editor: String,
}

impl Default for Settings {
    fn default() -> Self {
        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "vim".into());

        Self {
            backend_url: "http://localhost:5000".into(),
            timeout_secs: 30,
            model_extension: "xml".into(),
            editor,
        }
    }
}

/// Get the XDG config directory for fmconf.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "fmconf").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("fmconf.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/fmconf/fmconf.toml`
    /// 3. Environment variables: `FMCONF_*` prefix (explicit override)
    pub fn load() -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("backend_url", defaults.backend_url.clone())
            .map_err(config_err)?
            .set_default("timeout_secs", defaults.timeout_secs as i64)
            .map_err(config_err)?
            .set_default("model_extension", defaults.model_extension.clone())
            .map_err(config_err)?
            .set_default("editor", defaults.editor.clone())
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        builder = builder.add_source(Environment::with_prefix("FMCONF").try_parsing(true));

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        self.editor = expand_env_vars(&self.editor);
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# fmconf configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/fmconf/fmconf.toml
#   Env:    FMCONF_* environment variables (explicit overrides)

# Base URL of the analysis backend
# backend_url = "http://localhost:5000"

# Timeout for backend requests, in seconds
# timeout_secs = 30

# File extension accepted for model descriptions
# model_extension = "xml"

# Editor for editing the config file
# editor = "vim"
"#
        .to_string()
    }
}

/// Expand environment variables in a path-like string.
///
/// Uses shellexpand for robust expansion; invalid references fall back to
/// the original string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load().expect("load defaults");
        assert!(settings.backend_url.starts_with("http"));
        assert!(settings.timeout_secs > 0);
        assert_eq!(settings.model_extension, "xml");
        assert!(!settings.editor.is_empty());
    }

    #[test]
    fn given_tilde_in_editor_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            editor: "~/bin/myeditor".to_string(),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(
            settings.editor.starts_with(&home),
            "editor should start with home dir: {}",
            settings.editor
        );
    }

    #[test]
    fn given_template_when_parsing_then_valid_toml() {
        let template = Settings::template();
        let parsed: Result<toml::Value, _> = toml::from_str(&template);
        assert!(parsed.is_ok(), "template must parse as TOML");
    }
}
