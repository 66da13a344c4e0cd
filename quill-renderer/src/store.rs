//! Template store — name → compiled unit, behind one reader/writer lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use quill_core::TemplateName;

use crate::unit::CompiledUnit;

/// Thread-safe map of compiled units.
///
/// Entries are replaced wholesale, never mutated, so a poisoned lock still
/// guards a consistent map and is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct TemplateStore {
    units: RwLock<HashMap<TemplateName, Arc<CompiledUnit>>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `unit` under `name`, replacing any previous entry.
    ///
    /// The write lock is held for this insertion only.
    pub fn insert(&self, name: TemplateName, unit: CompiledUnit) {
        self.write().insert(name, Arc::new(unit));
    }

    /// A shared handle to the unit for `name`; the lock is released on return.
    pub fn get(&self, name: &str) -> Option<Arc<CompiledUnit>> {
        self.read().get(name).cloned()
    }

    /// Run `f` against the unit for `name` while holding the read lock.
    pub fn with_unit<R>(&self, name: &str, f: impl FnOnce(&CompiledUnit) -> R) -> Option<R> {
        let units = self.read();
        units.get(name).map(|unit| f(unit))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Every stored name, sorted.
    pub fn names(&self) -> Vec<TemplateName> {
        let mut names: Vec<_> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TemplateName, Arc<CompiledUnit>>> {
        self.units.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TemplateName, Arc<CompiledUnit>>> {
        self.units.write().unwrap_or_else(PoisonError::into_inner)
    }
}
