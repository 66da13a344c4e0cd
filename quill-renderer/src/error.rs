//! Error types for quill-renderer.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use quill_core::{ConfigError, TemplateName};

/// Errors raised while compiling templates into the store.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A referenced template file does not exist on disk.
    #[error("can't find template file '{name}' at {path}")]
    MissingTemplate { name: TemplateName, path: PathBuf },

    /// The views root exists but could not be walked.
    #[error("cannot walk views directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// An existing template file could not be read.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tera rejected the collected sources of a unit.
    #[error("failed to compile '{name}': {source}")]
    Compile {
        name: TemplateName,
        #[source]
        source: tera::Error,
    },

    /// The engine configuration is unusable.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    /// The configured delimiters produced an unusable directive pattern.
    #[error("invalid directive delimiters: {0}")]
    Syntax(#[from] regex::Error),
}

/// Errors raised while rendering a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Render requested with an empty template name.
    #[error("template name is empty")]
    EmptyName,

    /// The name is absent from the store, or a reference inside the unit
    /// was never resolved.
    #[error("can't find template '{name}' in the store")]
    TemplateNotFound { name: TemplateName },

    /// The template engine failed while executing.
    #[error("failed to execute '{name}': {source}")]
    Execution {
        name: TemplateName,
        #[source]
        source: tera::Error,
    },

    /// A development-mode rebuild could not scan the views root.
    #[error("rebuild before render failed: {0}")]
    Build(#[from] BuildError),

    /// Serializable data could not be turned into a render context.
    #[error("context error: {0}")]
    Context(#[source] tera::Error),

    /// Writing rendered output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io { path: path.into(), source }
}

/// Classify a Tera execution failure for the unit `name`.
///
/// Tera wraps a missing `include` target several levels deep, so the whole
/// source chain is searched for a `TemplateNotFound` kind.
pub(crate) fn execution_err(name: &TemplateName, source: tera::Error) -> RenderError {
    if let Some(missing) = missing_template(&source) {
        return RenderError::TemplateNotFound { name: missing };
    }
    RenderError::Execution { name: name.clone(), source }
}

fn missing_template(err: &tera::Error) -> Option<TemplateName> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(tera_err) = e.downcast_ref::<tera::Error>() {
            if let tera::ErrorKind::TemplateNotFound(missing) = &tera_err.kind {
                // include lists are reported as `[a, b]`
                let bare = missing.trim_start_matches('[').trim_end_matches(']');
                return Some(TemplateName::from(bare));
            }
        }
        current = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_not_found_is_classified() {
        let inner = tera::Error::template_not_found("nav");
        let outer = tera::Error::chain("Failed to render 'page.html'", inner);
        let err = execution_err(&TemplateName::from("page.html"), outer);
        match err {
            RenderError::TemplateNotFound { name } => assert_eq!(name.as_str(), "nav"),
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn other_failures_stay_execution_errors() {
        let err = execution_err(&TemplateName::from("page.html"), tera::Error::msg("boom"));
        assert!(matches!(err, RenderError::Execution { .. }));
    }
}
