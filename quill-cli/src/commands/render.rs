//! `quill render` — render one template to stdout or a file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use quill_core::LayoutSpec;
use quill_renderer::RenderContext;

use super::{parse_key_val, EngineArgs};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template to render, relative to the views root.
    pub template: String,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// JSON object used as the render context.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Extra context values; VALUE is parsed as JSON, falling back to a string.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub values: Vec<(String, String)>,

    /// Layout to wrap the rendered template in.
    #[arg(long)]
    pub layout: Option<String>,

    /// Layout sections as KEY=TEMPLATE; an empty TEMPLATE binds an empty string.
    #[arg(long = "section", value_name = "KEY=TEMPLATE", value_parser = parse_key_val)]
    pub sections: Vec<(String, String)>,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let engine = self.engine.engine()?;
        if !engine.config().run_mode.is_development() {
            let report = engine.build_all()?;
            tracing::debug!(
                built = report.built.len(),
                failed = report.failed.len(),
                "views built for production render"
            );
        }

        let mut ctx = self.context()?;
        let layout = self.layout_spec();

        match &self.output {
            Some(path) => {
                let file = fs::File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                engine
                    .render_to(file, &self.template, &mut ctx, layout.as_ref())
                    .with_context(|| format!("failed to render {}", self.template))?;
            }
            None => {
                let out = engine
                    .render(&self.template, &mut ctx, layout.as_ref())
                    .with_context(|| format!("failed to render {}", self.template))?;
                let mut stdout = io::stdout().lock();
                stdout.write_all(&out)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    fn context(&self) -> Result<RenderContext> {
        let mut ctx = match &self.data {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let value: Value = serde_json::from_str(&raw)
                    .with_context(|| format!("invalid JSON in {}", path.display()))?;
                RenderContext::from_value(value)
                    .with_context(|| format!("{} must hold a JSON object", path.display()))?
            }
            None => RenderContext::new(),
        };
        for (key, raw) in &self.values {
            let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            ctx.insert(key.as_str(), &value);
        }
        Ok(ctx)
    }

    fn layout_spec(&self) -> Option<LayoutSpec> {
        let layout = self.layout.as_deref()?;
        let spec = self
            .sections
            .iter()
            .fold(LayoutSpec::new(layout), |spec, (key, template)| {
                spec.with_section(key.as_str(), template.as_str())
            });
        Some(spec)
    }
}
