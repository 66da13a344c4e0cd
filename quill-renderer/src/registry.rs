//! Engine registry — recognised extensions and per-extension compilers.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use quill_core::TemplateName;

use crate::bindings::Bindings;
use crate::error::BuildError;
use crate::unit::CompiledUnit;

/// Alternate compiler for one extension.
///
/// Called with the views root, the template being built and the engine's
/// bindings; replaces the dependency resolver entirely for that file.
pub type CompilerFn =
    Arc<dyn Fn(&Path, &TemplateName, &Bindings) -> Result<CompiledUnit, BuildError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct EngineRegistry {
    extensions: Vec<String>,
    compilers: HashMap<String, CompilerFn>,
}

impl EngineRegistry {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for ext in extensions {
            registry.add_extension(ext.as_ref());
        }
        registry
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `path` ends in `.<ext>` for a recognised extension.
    pub fn has_template_ext(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| {
            path.strip_suffix(ext.as_str()).is_some_and(|stem| stem.ends_with('.'))
        })
    }

    /// Recognise `ext`; duplicates and a leading `.` are ignored.
    pub fn add_extension(&mut self, ext: &str) {
        let ext = ext.trim_start_matches('.');
        if ext.is_empty() || self.extensions.iter().any(|e| e == ext) {
            return;
        }
        self.extensions.push(ext.to_owned());
    }

    /// Route files with extension `ext` to `compiler`, recognising `ext` too.
    pub fn add_compiler<F>(&mut self, ext: &str, compiler: F)
    where
        F: Fn(&Path, &TemplateName, &Bindings) -> Result<CompiledUnit, BuildError>
            + Send
            + Sync
            + 'static,
    {
        self.add_extension(ext);
        self.compilers.insert(ext.trim_start_matches('.').to_owned(), Arc::new(compiler));
    }

    /// The compiler registered for the final extension of `name`, if any.
    pub fn compiler_for(&self, name: &TemplateName) -> Option<&CompilerFn> {
        name.extension().and_then(|ext| self.compilers.get(ext))
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("extensions", &self.extensions)
            .field("compilers", &self.compilers.keys().collect::<Vec<_>>())
            .finish()
    }
}
