//! Render context — the per-call data a template is executed against.

use serde::Serialize;
use serde_json::Value;

use crate::error::RenderError;

/// Key under which a layout receives the rendered main body.
///
/// The body and every section are inserted as plain strings, so a layout
/// with an autoescaped extension (`.html`, `.htm`, `.xml`) must mark them
/// `safe` or the already-rendered HTML is escaped a second time:
///
/// ```text
/// <body>{{ LayoutContent | safe }}</body>{{ Scripts | safe }}
/// ```
pub const LAYOUT_CONTENT_KEY: &str = "LayoutContent";

/// String-keyed data for one render call.
///
/// Owned by the caller of a single render and mutated in place when a layout
/// is composed; never shared between concurrent renders.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    inner: tera::Context,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from any value that serializes to a JSON object.
    pub fn from_serialize(data: impl Serialize) -> Result<Self, RenderError> {
        let inner = tera::Context::from_serialize(data).map_err(RenderError::Context)?;
        Ok(Self { inner })
    }

    /// Build a context from a JSON object.
    pub fn from_value(value: Value) -> Result<Self, RenderError> {
        let inner = tera::Context::from_value(value).map_err(RenderError::Context)?;
        Ok(Self { inner })
    }

    pub fn insert<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) {
        self.inner.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    pub fn into_json(self) -> Value {
        self.inner.into_json()
    }

    pub(crate) fn as_tera(&self) -> &tera::Context {
        &self.inner
    }
}

impl From<tera::Context> for RenderContext {
    fn from(inner: tera::Context) -> Self {
        Self { inner }
    }
}
