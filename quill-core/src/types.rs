//! Domain types shared by the engine and its front ends.
//!
//! Template names are always `/`-separated and relative to the views root,
//! regardless of the host's path conventions.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A template identifier, unique within a template store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateName(pub String);

impl TemplateName {
    /// Derive a name from a path relative to the views root.
    ///
    /// Backslashes become `/` and any leading separator is dropped, so
    /// `admin\errors\404.html` and `/admin/errors/404.html` both map to
    /// `admin/errors/404.html`.
    pub fn from_relative_path(path: &Path) -> Self {
        let raw = path.to_string_lossy().replace('\\', "/");
        Self(raw.trim_start_matches('/').to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The subdirectory part of the name, `"."` for top-level templates.
    pub fn dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => ".",
        }
    }

    /// The extension after the final `.` of the last path segment, if any.
    pub fn extension(&self) -> Option<&str> {
        let file = self.0.rsplit('/').next().unwrap_or(&self.0);
        file.rfind('.').map(|idx| &file[idx + 1..]).filter(|ext| !ext.is_empty())
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TemplateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TemplateName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<&String> for TemplateName {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl Borrow<str> for TemplateName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Whether templates are rebuilt before every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Rebuild the templates a render touches before executing them.
    #[default]
    Development,
    /// Build once at startup and only read afterwards.
    Production,
}

impl RunMode {
    pub fn is_development(self) -> bool {
        self == RunMode::Development
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunMode::Development => "development",
            RunMode::Production => "production",
        };
        f.write_str(s)
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(RunMode::Development),
            "prod" | "production" => Ok(RunMode::Production),
            other => Err(ConfigError::InvalidRunMode(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// A layout template plus the named sections injected into it.
///
/// Section values are template names; an empty value means the section key
/// is set to an empty string rather than rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub layout: TemplateName,
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
}

impl LayoutSpec {
    pub fn new(layout: impl Into<TemplateName>) -> Self {
        Self { layout: layout.into(), sections: BTreeMap::new() }
    }

    /// Bind `key` to the rendered output of `template`.
    pub fn with_section(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.sections.insert(key.into(), template.into());
        self
    }

    /// Bind `key` to an empty string.
    pub fn with_empty_section(self, key: impl Into<String>) -> Self {
        self.with_section(key, String::new())
    }

    /// Section templates that actually need rendering, in key order.
    pub fn section_templates(&self) -> impl Iterator<Item = &str> {
        self.sections.values().map(String::as_str).filter(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
