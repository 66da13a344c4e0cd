//! The template engine — builder and renderer over one [`TemplateStore`].
//!
//! # Lifecycle
//!
//! 1. Configure: [`Engine::new`], then `add_function`, `add_filter`,
//!    `add_template_ext`, `add_template_engine` while the engine is still
//!    exclusively owned.
//! 2. Build: [`Engine::build_all`] compiles every template under the views root.
//! 3. Render: [`Engine::render`] from any number of threads. In development
//!    mode each render first rebuilds the templates it touches.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use quill_core::{EngineConfig, LayoutSpec, TemplateName};

use crate::bindings::Bindings;
use crate::context::{RenderContext, LAYOUT_CONTENT_KEY};
use crate::directive::DirectiveSyntax;
use crate::error::{io_err, BuildError, RenderError};
use crate::registry::EngineRegistry;
use crate::resolver::Resolver;
use crate::source::{scan_views, TemplateFiles};
use crate::store::TemplateStore;
use crate::unit::CompiledUnit;

// ---------------------------------------------------------------------------
// BuildReport
// ---------------------------------------------------------------------------

/// Outcome of one build pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Templates compiled and stored, in build order.
    pub built: Vec<TemplateName>,
    /// Templates that failed; their previous store entries are untouched.
    pub failed: Vec<(TemplateName, BuildError)>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One independent template engine: configuration, bindings, and store.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    registry: EngineRegistry,
    bindings: Bindings,
    syntax: DirectiveSyntax,
    store: TemplateStore,
}

impl Engine {
    /// Construct an engine with an empty store. Nothing is read from disk.
    pub fn new(config: EngineConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let syntax = DirectiveSyntax::new(&config.delimiters)?;
        let registry = EngineRegistry::new(&config.extensions);
        Ok(Engine {
            config,
            registry,
            bindings: Bindings::new(),
            syntax,
            store: TemplateStore::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Make `function` callable from every template built afterwards.
    pub fn add_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.bindings.add_function(name, function);
    }

    /// Make `filter` usable from every template built afterwards.
    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.bindings.add_filter(name, filter);
    }

    /// Recognise files ending in `.<ext>` as templates.
    pub fn add_template_ext(&mut self, ext: &str) {
        self.registry.add_extension(ext);
        self.config.add_extension(ext);
    }

    /// Compile files ending in `.<ext>` with `compiler` instead of the resolver.
    pub fn add_template_engine<F>(&mut self, ext: &str, compiler: F)
    where
        F: Fn(&Path, &TemplateName, &Bindings) -> Result<CompiledUnit, BuildError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.add_compiler(ext, compiler);
        self.config.add_extension(ext);
    }

    // -----------------------------------------------------------------------
    // Builder
    // -----------------------------------------------------------------------

    /// Discover the templates under the views root without compiling them.
    pub fn scan(&self) -> Result<TemplateFiles, BuildError> {
        scan_views(&self.config.views_path, &self.registry)
    }

    /// Compile every template under the views root.
    pub fn build_all(&self) -> Result<BuildReport, BuildError> {
        self.build::<&str>(&[])
    }

    /// Compile the named templates, or every template when `files` is empty.
    ///
    /// An absent views root is not an error and builds nothing. Per-file
    /// failures are logged and reported; they never abort the pass.
    pub fn build<S: AsRef<str>>(&self, files: &[S]) -> Result<BuildReport, BuildError> {
        let root = &self.config.views_path;
        match std::fs::metadata(root) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(root = %root.display(), "views directory absent, nothing to build");
                return Ok(BuildReport::default());
            }
            Err(e) => return Err(io_err(root, e)),
        }

        let tree = self.scan()?;
        let wanted: Vec<&str> = files.iter().map(AsRef::as_ref).collect();
        let mut report = BuildReport::default();

        for (_, group) in tree.groups() {
            for file in group {
                if !wanted.is_empty() && !wanted.contains(&file.as_str()) {
                    continue;
                }
                match self.compile_file(file, group) {
                    Ok(unit) => {
                        tracing::debug!(template = %file, "compiled");
                        self.store.insert(file.clone(), unit);
                        report.built.push(file.clone());
                    }
                    Err(err) => {
                        tracing::warn!(template = %file, error = %err, "parse template err");
                        report.failed.push((file.clone(), err));
                    }
                }
            }
        }

        tracing::info!(
            root = %root.display(),
            built = report.built.len(),
            failed = report.failed.len(),
            "template build finished"
        );
        Ok(report)
    }

    fn compile_file(
        &self,
        file: &TemplateName,
        siblings: &[TemplateName],
    ) -> Result<CompiledUnit, BuildError> {
        let root = self.config.views_path.as_path();
        if let Some(compiler) = self.registry.compiler_for(file) {
            return compiler(root, file, &self.bindings);
        }
        Resolver::new(root, &self.syntax, &self.registry).compile(
            file,
            siblings,
            &self.bindings,
            self.config.autoescape,
        )
    }

    // -----------------------------------------------------------------------
    // Renderer
    // -----------------------------------------------------------------------

    /// Render `name` against `ctx`, composing `layout` around it if given.
    ///
    /// With a layout, `ctx` gains `LayoutContent` plus one key per section
    /// before the layout executes. Both are plain strings: an autoescaped
    /// layout must write `{{ LayoutContent | safe }}` (and `| safe` on each
    /// section) to emit the body's HTML unchanged. See [`LAYOUT_CONTENT_KEY`].
    pub fn render(
        &self,
        name: &str,
        ctx: &mut RenderContext,
        layout: Option<&LayoutSpec>,
    ) -> Result<Vec<u8>, RenderError> {
        self.render_string(name, ctx, layout).map(String::into_bytes)
    }

    /// [`Engine::render`] returning text.
    pub fn render_string(
        &self,
        name: &str,
        ctx: &mut RenderContext,
        layout: Option<&LayoutSpec>,
    ) -> Result<String, RenderError> {
        if name.is_empty() {
            return Err(RenderError::EmptyName);
        }
        let layout = layout.filter(|spec| !spec.layout.is_empty());

        if self.config.run_mode.is_development() {
            let mut targets = vec![name];
            if let Some(spec) = layout {
                targets.push(spec.layout.as_str());
                targets.extend(spec.section_templates());
            }
            self.build(&targets)?;
        }

        let body = self.execute(name, ctx)?;
        let Some(spec) = layout else {
            return Ok(body);
        };

        ctx.insert(LAYOUT_CONTENT_KEY, &body);
        for (key, template) in &spec.sections {
            if template.is_empty() {
                ctx.insert(key.as_str(), "");
                continue;
            }
            let section = self.execute(template, ctx)?;
            ctx.insert(key.as_str(), &section);
        }
        self.execute(spec.layout.as_str(), ctx)
    }

    /// [`Engine::render`] into `out`.
    pub fn render_to<W: Write>(
        &self,
        mut out: W,
        name: &str,
        ctx: &mut RenderContext,
        layout: Option<&LayoutSpec>,
    ) -> Result<(), RenderError> {
        let rendered = self.render_string(name, ctx, layout)?;
        out.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// Execute one stored unit. Development renders hold the read lock for
    /// the whole execution; production renders only for the lookup.
    fn execute(&self, name: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        let not_found = || RenderError::TemplateNotFound { name: TemplateName::from(name) };
        let result = if self.config.run_mode.is_development() {
            self.store.with_unit(name, |unit| unit.execute(ctx)).ok_or_else(not_found)?
        } else {
            self.store.get(name).ok_or_else(not_found)?.execute(ctx)
        };
        if let Err(err) = &result {
            tracing::warn!(template = name, error = %err, "template execute err");
        }
        result
    }
}
