//! # quill-renderer
//!
//! Tera-backed template engine that compiles a views directory into
//! self-contained units and renders them, optionally inside a layout.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quill_core::{EngineConfig, LayoutSpec, RunMode};
//! use quill_renderer::{Engine, RenderContext};
//!
//! fn render_home() -> Result<String, Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default()
//!         .with_views_path("views")
//!         .with_run_mode(RunMode::Production);
//!     let engine = Engine::new(config)?;
//!     engine.build_all()?;
//!
//!     let mut ctx = RenderContext::new();
//!     ctx.insert("title", "Home");
//!     let layout = LayoutSpec::new("layout.html").with_section("Scripts", "scripts.html");
//!     Ok(engine.render_string("index.html", &mut ctx, Some(&layout))?)
//! }
//! ```

pub mod bindings;
pub mod context;
pub mod directive;
pub mod engine;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod store;
pub mod unit;

pub use bindings::{Bindings, TemplateFilter, TemplateFunction};
pub use context::{RenderContext, LAYOUT_CONTENT_KEY};
pub use engine::{BuildReport, Engine};
pub use error::{BuildError, RenderError};
pub use registry::{CompilerFn, EngineRegistry};
pub use source::{scan_views, TemplateFiles};
pub use store::TemplateStore;
pub use unit::CompiledUnit;
