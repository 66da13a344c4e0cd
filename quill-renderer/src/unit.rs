//! Compiled units — one executable template plus its resolved dependencies.

use tera::Tera;

use quill_core::TemplateName;

use crate::bindings::Bindings;
use crate::context::RenderContext;
use crate::error::{execution_err, BuildError, RenderError};

/// An immutable Tera namespace whose entry point is [`CompiledUnit::name`].
///
/// Every template the entry reaches through reference directives at build
/// time is registered in the same namespace under its own name.
#[derive(Debug)]
pub struct CompiledUnit {
    name: TemplateName,
    tera: Tera,
}

impl CompiledUnit {
    /// Wrap an already-populated Tera instance, e.g. from an alternate compiler.
    ///
    /// Fails with [`BuildError::Compile`] unless `tera` contains a template
    /// called `name`.
    pub fn from_tera(name: TemplateName, tera: Tera) -> Result<Self, BuildError> {
        if !tera.get_template_names().any(|n| n == name.as_str()) {
            let source = tera::Error::template_not_found(name.as_str());
            return Err(BuildError::Compile { name, source });
        }
        Ok(Self { name, tera })
    }

    /// Compile `(name, body)` sources into one namespace in a single pass, so
    /// inheritance and macro imports between them are checked together.
    pub fn from_sources(
        name: TemplateName,
        sources: Vec<(String, String)>,
        bindings: &Bindings,
        autoescape: bool,
    ) -> Result<Self, BuildError> {
        let mut tera = Tera::default();
        if !autoescape {
            tera.autoescape_on(vec![]);
        }
        bindings.apply(&mut tera);
        tera.add_raw_templates(sources)
            .map_err(|source| BuildError::Compile { name: name.clone(), source })?;
        Ok(Self { name, tera })
    }

    pub fn name(&self) -> &TemplateName {
        &self.name
    }

    /// Whether `template` is reachable inside this unit.
    pub fn contains(&self, template: &str) -> bool {
        self.tera.get_template_names().any(|n| n == template)
    }

    /// Every template registered in the unit, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Execute the entry template against `ctx`.
    pub fn execute(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        self.tera
            .render(self.name.as_str(), ctx.as_tera())
            .map_err(|e| execution_err(&self.name, e))
    }
}
