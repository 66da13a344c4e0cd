//! Template source discovery.
//!
//! Walks a views root and groups every recognised template by the
//! subdirectory it lives in. With a root of `views`:
//!
//! | path on disk                     | group          | name                     |
//! |----------------------------------|----------------|--------------------------|
//! | `views/index.html`               | `.`            | `index.html`             |
//! | `views/errors/404.html`          | `errors`       | `errors/404.html`        |
//! | `views/admin/errors/404.html`    | `admin/errors` | `admin/errors/404.html`  |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use quill_core::TemplateName;

use crate::error::BuildError;
use crate::registry::EngineRegistry;

/// Template files under one root, grouped by subdirectory.
#[derive(Debug, Clone, Default)]
pub struct TemplateFiles {
    root: PathBuf,
    groups: BTreeMap<String, Vec<TemplateName>>,
}

impl TemplateFiles {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `(subdirectory, files)` pairs in directory order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[TemplateName])> {
        self.groups.iter().map(|(dir, files)| (dir.as_str(), files.as_slice()))
    }

    /// The group `name` belongs to, i.e. its siblings including itself.
    pub fn siblings_of(&self, name: &TemplateName) -> &[TemplateName] {
        self.groups.get(name.dir()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.values().flatten().any(|n| n.as_str() == name)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Walk `root` and collect every file with a recognised extension.
///
/// Directories and symlinks are skipped. Any walk failure aborts with
/// `BuildError::DirectoryAccess`.
pub fn scan_views(root: &Path, registry: &EngineRegistry) -> Result<TemplateFiles, BuildError> {
    let mut files = TemplateFiles { root: root.to_path_buf(), groups: BTreeMap::new() };
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry
            .map_err(|source| BuildError::DirectoryAccess { path: root.to_path_buf(), source })?;
        if entry.file_type().is_dir() || entry.path_is_symlink() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = TemplateName::from_relative_path(rel);
        if !registry.has_template_ext(name.as_str()) {
            continue;
        }
        files.groups.entry(name.dir().to_owned()).or_default().push(name);
    }
    Ok(files)
}
