//! Closed, name-keyed table of executor-family adapters (§4.4).
//!
//! Grounded directly on `arvak_hal::registry::BackendRegistry`: a builtin
//! factory map, `register`/`create`, and an unknown-name error. Unlike the
//! teacher, there is no `dynamic-backends` plugin-loading feature — the
//! spec's registry is a fixed, closed table ("Adding an executor family
//! requires only inserting its factory into the registry; no caller code
//! changes" — a statement about maintainability, not about runtime
//! plugin discovery).

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::{HalError, HalResult};
use crate::executor::{Executor, ExecutorFactory};

pub struct ExecutorRegistry {
    factories: FxHashMap<String, Box<dyn ExecutorFactory>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, family: impl Into<String>, factory: Box<dyn ExecutorFactory>) {
        self.factories.insert(family.into(), factory);
    }

    pub fn create(&self, family: &str, config: &Value) -> HalResult<Box<dyn Executor>> {
        let factory = self
            .factories
            .get(family)
            .ok_or_else(|| HalError::UnsupportedExecutor(family.to_string()))?;
        factory.create(config)
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.factories.contains_key(family)
    }

    /// Sorted family names, for deterministic display/logging.
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Derive a family tag from a (possibly pilot-prefixed) resource name:
    /// substring match against the registry's known family names, default
    /// `qiskit` (§4.4).
    pub fn derive_family(&self, resource_name: &str) -> String {
        let lower = resource_name.to_ascii_lowercase();
        let mut candidates = self.families();
        candidates.sort_by_key(|f| std::cmp::Reverse(f.len()));
        candidates
            .into_iter()
            .find(|family| lower.contains(family.as_str()))
            .unwrap_or_else(|| "qiskit".to_string())
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
