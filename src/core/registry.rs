//! Registry for sensor directory backends

use super::backend::BoxedBackend;
use anyhow::{anyhow, Result};
use std::collections::HashMap;

/// Function that creates a backend
pub type BackendFactory = fn() -> BoxedBackend;

/// Registry of sensor directory backends
///
/// Maps backend ids to factories so the CLI and the configuration can
/// pick a directory by name.
pub struct Registry {
    backends: HashMap<String, BackendFactory>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Register a backend
    pub fn register_backend(&mut self, id: &str, factory: BackendFactory) {
        self.backends.insert(id.to_string(), factory);
    }

    /// Create a backend by id
    pub fn create_backend(&self, id: &str) -> Result<BoxedBackend> {
        let factory = self
            .backends
            .get(id)
            .ok_or_else(|| anyhow!("Unknown backend: {}", id))?;
        Ok(factory())
    }

    /// List all registered backend ids, sorted for stable output
    pub fn list_backends(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.backends.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends;

    #[test]
    fn test_builtin_backends_are_creatable() {
        let mut registry = Registry::new();
        backends::register_all(&mut registry);

        for id in registry.list_backends() {
            let backend = registry.create_backend(&id).unwrap();
            assert_eq!(backend.id(), id);
        }
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let registry = Registry::new();
        assert!(registry.create_backend("nope").is_err());
    }
}
