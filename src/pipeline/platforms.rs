//! Name-keyed lookup-or-create registry for platforms

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Platform, PlatformId, ValidationResult};

/// Registry of known platforms
///
/// Platform cardinality is small, so a hash map is enough; ids are handed
/// out sequentially from 1 in order of first appearance.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    by_name: HashMap<String, Arc<Platform>>,
    next_id: PlatformId,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the platform registered under `name`, creating it on first use
    pub fn resolve(&mut self, name: &str) -> ValidationResult<Arc<Platform>> {
        let name = name.trim();
        if let Some(platform) = self.by_name.get(name) {
            return Ok(Arc::clone(platform));
        }

        let platform = Arc::new(Platform::new(self.next_id + 1, name)?);
        self.next_id += 1;
        self.by_name
            .insert(platform.name().to_string(), Arc::clone(&platform));
        tracing::debug!(platform = %platform.name(), id = platform.id(), "Registered platform");
        Ok(platform)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Platform>> {
        self.by_name.get(name.trim())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered platforms ordered by name
    pub fn platforms(&self) -> Vec<Arc<Platform>> {
        let mut platforms: Vec<_> = self.by_name.values().cloned().collect();
        platforms.sort();
        platforms
    }
}
