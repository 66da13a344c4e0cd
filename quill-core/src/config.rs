//! Engine configuration.
//!
//! Configuration is plain data: it is set up before the first build, either in
//! code or from a YAML file, and handed to the engine by value.
//!
//! ```yaml
//! run_mode: production
//! views_path: views
//! delimiters:
//!   left: "{%"
//!   right: "%}"
//! extensions: [html, tpl]
//! autoescape: true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::RunMode;

/// Default file name looked up by front ends when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "quill.yaml";

/// Delimiter pair enclosing reference and `define` directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self { left: "{%".to_owned(), right: "%}".to_owned() }
    }
}

/// Process-level settings for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub run_mode: RunMode,
    pub views_path: PathBuf,
    pub delimiters: Delimiters,
    /// Recognised template extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Keep HTML autoescaping for `.html`, `.htm` and `.xml` templates.
    pub autoescape: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::default(),
            views_path: PathBuf::from("views"),
            delimiters: Delimiters::default(),
            extensions: vec!["html".to_owned(), "tpl".to_owned()],
            autoescape: true,
        }
    }
}

impl EngineConfig {
    pub fn with_views_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.views_path = path.into();
        self
    }

    pub fn with_run_mode(mut self, mode: RunMode) -> Self {
        self.run_mode = mode;
        self
    }

    pub fn with_delimiters(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.delimiters = Delimiters { left: left.into(), right: right.into() };
        self
    }

    pub fn with_autoescape(mut self, on: bool) -> Self {
        self.autoescape = on;
        self
    }

    /// Register an extra extension; duplicates and a leading `.` are ignored.
    pub fn add_extension(&mut self, ext: &str) {
        let ext = ext.trim_start_matches('.');
        if ext.is_empty() || self.extensions.iter().any(|e| e == ext) {
            return;
        }
        self.extensions.push(ext.to_owned());
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delimiters.left.is_empty() || self.delimiters.right.is_empty() {
            return Err(ConfigError::EmptyDelimiter);
        }
        Ok(())
    }
}

/// Load and validate an [`EngineConfig`] from a YAML file.
///
/// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with the
/// path) if malformed. Missing fields take their defaults.
pub fn load_config_at(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_yaml::from_str(&contents)
        .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), source: e })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_layout() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.run_mode, RunMode::Development);
        assert_eq!(cfg.views_path, PathBuf::from("views"));
        assert_eq!(cfg.extensions, vec!["html", "tpl"]);
        assert_eq!(cfg.delimiters.left, "{%");
        assert!(cfg.autoescape);
    }

    #[test]
    fn add_extension_deduplicates_and_strips_dot() {
        let mut cfg = EngineConfig::default();
        cfg.add_extension(".md");
        cfg.add_extension("md");
        cfg.add_extension("html");
        assert_eq!(cfg.extensions, vec!["html", "tpl", "md"]);
    }

    #[test]
    fn empty_delimiter_is_rejected() {
        let cfg = EngineConfig::default().with_delimiters("", "}}");
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyDelimiter)));
    }
}
