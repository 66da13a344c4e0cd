//! Typed function and filter bindings merged into every compiled unit.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tera::Tera;

/// A template function: `{{ name(arg=value) }}`.
pub type TemplateFunction =
    Arc<dyn Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// A template filter: `{{ value | name(arg=value) }}`.
pub type TemplateFilter =
    Arc<dyn Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// Name → callable registry. Later registrations under the same name win.
#[derive(Clone, Default)]
pub struct Bindings {
    functions: BTreeMap<String, TemplateFunction>,
    filters: BTreeMap<String, TemplateFilter>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Register every binding on `tera`.
    pub fn apply(&self, tera: &mut Tera) {
        for (name, function) in &self.functions {
            let function = Arc::clone(function);
            tera.register_function(name, move |args: &HashMap<String, Value>| function(args));
        }
        for (name, filter) in &self.filters {
            let filter = Arc::clone(filter);
            tera.register_filter(
                name,
                move |value: &Value, args: &HashMap<String, Value>| filter(value, args),
            );
        }
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}
