//! Memo of completed scope trees keyed by resolved file identity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Completed loads, keyed by the canonical path of the file.
///
/// Append-only: the first scope stored for a path stays. Cached scopes are
/// shared and never mutated again. Pass the same cache to every load that
/// should share parse results; a fresh cache isolates loads from each other.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<PathBuf, Arc<crate::Scope>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Arc<crate::Scope>> {
        self.entries.get(path).cloned()
    }

    pub fn put(&mut self, path: PathBuf, scope: Arc<crate::Scope>) {
        self.entries.entry(path).or_insert(scope);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
