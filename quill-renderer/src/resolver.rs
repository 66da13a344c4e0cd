//! Dependency resolver — compiles one template file and everything it
//! references into a single [`CompiledUnit`].
//!
//! # Resolution order
//!
//! 1. The file itself is read, its `define` blocks lifted out, and every name
//!    registered in the unit's [`Namespace`].
//! 2. Each reference naming a template file (recognised extension) is loaded
//!    recursively; `../` references resolve against the referencing file's
//!    directory, all others against the views root.
//! 3. References still unresolved are looked up among the file's siblings:
//!    first a sibling whose name equals the reference, then a sibling that
//!    `define`s it.
//!
//! A name is registered before its own references are walked, so mutually
//! referencing templates terminate.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quill_core::TemplateName;
use tera::Template;

use crate::bindings::Bindings;
use crate::directive::DirectiveSyntax;
use crate::error::{io_err, BuildError};
use crate::registry::EngineRegistry;
use crate::unit::CompiledUnit;

/// Templates collected for one unit so far, plus the visited set that breaks
/// reference cycles.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    visited: HashSet<String>,
    sources: Vec<(String, String)>,
}

impl Namespace {
    pub fn contains(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    /// Register `body` under `name`. Returns `false` and keeps the existing
    /// body if `name` was already registered.
    pub fn register(&mut self, name: &str, body: String) -> bool {
        if !self.visited.insert(name.to_owned()) {
            return false;
        }
        self.sources.push((name.to_owned(), body));
        true
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources registered after the first `len` entries.
    pub fn sources_since(&self, len: usize) -> &[(String, String)] {
        self.sources.get(len..).unwrap_or_default()
    }

    pub fn into_sources(self) -> Vec<(String, String)> {
        self.sources
    }
}

/// Parse every source on its own. Inheritance and macro imports are only
/// checked once the whole unit is compiled.
fn parse_each(sources: &[(String, String)]) -> Result<(), BuildError> {
    for (name, body) in sources {
        Template::new(name, None, body)
            .map_err(|source| BuildError::Compile { name: TemplateName::from(name), source })?;
    }
    Ok(())
}

/// Resolves references for files under one views root.
pub struct Resolver<'a> {
    root: &'a Path,
    syntax: &'a DirectiveSyntax,
    registry: &'a EngineRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(root: &'a Path, syntax: &'a DirectiveSyntax, registry: &'a EngineRegistry) -> Self {
        Self { root, syntax, registry }
    }

    /// Compile `file` with `siblings` (the files of its directory, itself
    /// included) as the fallback for block references.
    pub fn compile(
        &self,
        file: &TemplateName,
        siblings: &[TemplateName],
        bindings: &Bindings,
        autoescape: bool,
    ) -> Result<CompiledUnit, BuildError> {
        let namespace = self.resolve(file, siblings)?;
        CompiledUnit::from_sources(file.clone(), namespace.into_sources(), bindings, autoescape)
    }

    /// Collect the sources of `file` and its dependencies without compiling.
    pub fn resolve(
        &self,
        file: &TemplateName,
        siblings: &[TemplateName],
    ) -> Result<Namespace, BuildError> {
        let mut namespace = Namespace::default();
        let references = self.load(file.as_str(), None, &mut namespace)?;
        self.resolve_from_siblings(&references, siblings, &mut namespace);
        Ok(namespace)
    }

    /// Register `file` and, recursively, every file it references.
    ///
    /// Returns the raw references found in `file`.
    fn load(
        &self,
        file: &str,
        parent: Option<&str>,
        namespace: &mut Namespace,
    ) -> Result<Vec<String>, BuildError> {
        let path = self.resolve_path(file, parent);
        if !path.is_file() {
            tracing::debug!(template = file, path = %path.display(), "can't find template file");
            return Err(BuildError::MissingTemplate { name: TemplateName::from(file), path });
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let scanned = self.syntax.scan(&raw);

        namespace.register(file, scanned.body);
        for block in scanned.defines {
            if !namespace.register(&block.name, block.body) {
                tracing::debug!(template = file, block = %block.name, "block already defined");
            }
        }

        for reference in &scanned.references {
            if namespace.contains(reference) || !self.registry.has_template_ext(reference) {
                continue;
            }
            if scanned.optional.contains(reference)
                && !self.resolve_path(reference, Some(file)).is_file()
            {
                tracing::debug!(template = file, reference = %reference, "optional include absent");
                continue;
            }
            self.load(reference, Some(file), namespace)?;
        }
        Ok(scanned.references)
    }

    /// Satisfy still-unresolved `references` from sibling files.
    ///
    /// A sibling that fails to load or parse is logged and skipped; its
    /// reference stays unresolved and fails when executed.
    fn resolve_from_siblings(
        &self,
        references: &[String],
        siblings: &[TemplateName],
        namespace: &mut Namespace,
    ) {
        for reference in references {
            if namespace.contains(reference) {
                continue;
            }
            let found = siblings
                .iter()
                .find(|s| s.as_str() == reference.as_str())
                .or_else(|| siblings.iter().find(|s| self.sibling_defines(s, reference)));
            let Some(sibling) = found else {
                tracing::debug!(reference = %reference, "reference not resolved from siblings");
                continue;
            };
            if namespace.contains(sibling.as_str()) {
                continue;
            }

            let mut scratch = namespace.clone();
            let loaded = self
                .load(sibling.as_str(), None, &mut scratch)
                .and_then(|nested| {
                    parse_each(scratch.sources_since(namespace.len()))?;
                    Ok(nested)
                });
            match loaded {
                Ok(nested) => {
                    *namespace = scratch;
                    self.resolve_from_siblings(&nested, siblings, namespace);
                }
                Err(err) => {
                    tracing::warn!(template = %sibling, error = %err, "template parse file err");
                }
            }
        }
    }

    fn sibling_defines(&self, sibling: &TemplateName, name: &str) -> bool {
        match std::fs::read_to_string(self.root.join(sibling.as_str())) {
            Ok(raw) => self.syntax.defines(&raw, name),
            Err(_) => false,
        }
    }

    fn resolve_path(&self, file: &str, parent: Option<&str>) -> PathBuf {
        match parent {
            Some(parent) if file.starts_with("../") => {
                let parent_dir = Path::new(parent).parent().unwrap_or_else(|| Path::new(""));
                self.root.join(parent_dir).join(file)
            }
            _ => self.root.join(file),
        }
    }
}
