//! `quill list` — show discovered templates grouped by directory.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::EngineArgs;

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled, Serialize)]
struct TemplateRow {
    #[tabled(rename = "Directory")]
    directory: String,
    #[tabled(rename = "Template")]
    template: String,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let engine = self.engine.engine()?;
        let root = engine.config().views_path.clone();
        if !root.exists() {
            println!("No views directory at {}", root.display());
            return Ok(());
        }

        let tree = engine.scan()?;
        let rows: Vec<TemplateRow> = tree
            .groups()
            .flat_map(|(dir, names)| {
                names.iter().map(move |name| TemplateRow {
                    directory: dir.to_string(),
                    template: name.to_string(),
                })
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }
        if rows.is_empty() {
            println!("No templates found under {}", root.display());
            return Ok(());
        }

        let count = rows.len();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{count} template(s)");
        Ok(())
    }
}
