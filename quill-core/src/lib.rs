//! Quill core library — domain types, engine configuration, errors.
//!
//! - [`types`] — [`TemplateName`], [`RunMode`], [`LayoutSpec`]
//! - [`config`] — [`EngineConfig`] and YAML loading
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config_at, Delimiters, EngineConfig, DEFAULT_CONFIG_FILE};
pub use error::ConfigError;
pub use types::{LayoutSpec, RunMode, TemplateName};
