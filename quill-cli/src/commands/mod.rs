//! Subcommands and the engine options they share.

pub mod build;
pub mod list;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use quill_core::{load_config_at, EngineConfig, RunMode, DEFAULT_CONFIG_FILE};
use quill_renderer::Engine;

/// Options that locate and configure the views tree.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Config file; defaults to `./quill.yaml` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Views root, overriding the config file.
    #[arg(long)]
    pub views: Option<PathBuf>,

    /// Run mode (`development` or `production`), overriding the config file.
    #[arg(long)]
    pub mode: Option<RunMode>,
}

impl EngineArgs {
    /// Resolve the effective configuration: file, then flag overrides.
    pub fn config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_at(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                load_config_at(Path::new(DEFAULT_CONFIG_FILE))
                    .with_context(|| format!("failed to load {DEFAULT_CONFIG_FILE}"))?
            }
            None => EngineConfig::default(),
        };
        if let Some(views) = &self.views {
            config.views_path = views.clone();
        }
        if let Some(mode) = self.mode {
            config.run_mode = mode;
        }
        Ok(config)
    }

    pub fn engine(&self) -> Result<Engine> {
        let config = self.config()?;
        Engine::new(config).context("invalid engine configuration")
    }
}

/// Parse `key=value`; the value may be empty.
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_allows_empty_value() {
        assert_eq!(parse_key_val("Head=").unwrap(), ("Head".to_string(), String::new()));
        assert_eq!(
            parse_key_val("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
    }

    #[test]
    fn key_val_rejects_missing_separator_or_key() {
        assert!(parse_key_val("nokey").is_err());
        assert!(parse_key_val("=value").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = EngineArgs {
            config: None,
            views: Some(PathBuf::from("site")),
            mode: Some(RunMode::Production),
        };
        let config = args.config().unwrap();
        assert_eq!(config.views_path, PathBuf::from("site"));
        assert_eq!(config.run_mode, RunMode::Production);
    }
}
