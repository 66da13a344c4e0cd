//! `quill build` — compile the views tree and report per-file results.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use super::EngineArgs;

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Only compile these templates (names relative to the views root).
    pub templates: Vec<String>,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let engine = self.engine.engine()?;
        let root = engine.config().views_path.clone();
        let report = engine.build(&self.templates)?;

        if report.built.is_empty() && report.failed.is_empty() {
            println!("No templates found under {}", root.display());
            return Ok(());
        }

        for name in &report.built {
            println!("{} {}", "✓".green().bold(), name);
        }
        for (name, err) in &report.failed {
            println!("{} {}: {}", "✗".red().bold(), name.to_string().bold(), err);
        }

        println!(
            "\n{} built, {} failed",
            report.built.len().to_string().green(),
            report.failed.len().to_string().red(),
        );

        if !report.is_success() {
            bail!("{} template(s) failed to build", report.failed.len());
        }
        Ok(())
    }
}
