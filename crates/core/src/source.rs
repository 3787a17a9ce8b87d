//! Source provider abstraction for filesystem-independent loading.
//!
//! The [`SourceProvider`] trait is the only place the loader touches I/O:
//! reading a file as lines, resolving an include path, and producing the
//! identity used for cycle detection and caching.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Trait that abstracts file I/O for the load pipeline.
pub trait SourceProvider {
    /// Read the file at `path` as an ordered list of lines, without line terminators.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, std::io::Error>;

    /// Resolve an include path (already using `/` separators) against a base directory.
    fn resolve_include(&self, base: &Path, include: &str) -> Result<PathBuf, std::io::Error>;

    /// Canonicalize a path. The result is the file's identity for cycle
    /// detection and for the load cache.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, std::io::Error>;
}

/// Default filesystem-backed source provider.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, std::io::Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(text.lines().map(str::to_owned).collect())
    }

    fn resolve_include(&self, base: &Path, include: &str) -> Result<PathBuf, std::io::Error> {
        Ok(base.join(include))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, std::io::Error> {
        path.canonicalize()
    }
}

/// In-memory source provider for embedding and testing.
///
/// Maps paths to source text. Canonicalization normalizes the path
/// lexically and requires the file to exist in the map.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        Self { files }
    }

    /// Add or replace a file.
    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.files
            .insert(Self::normalize_path(path.as_ref()), text.into());
        self
    }

    /// Normalize a path by resolving `.` and `..` components without
    /// touching the filesystem.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    // pop unless we are at root
                    if !components.is_empty() {
                        components.pop();
                    }
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }

    fn not_found(path: &Path) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found in memory: {}", path.display()),
        )
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, std::io::Error> {
        let normalized = Self::normalize_path(path);
        self.files
            .get(&normalized)
            .map(|text| text.lines().map(str::to_owned).collect())
            .ok_or_else(|| Self::not_found(&normalized))
    }

    fn resolve_include(&self, base: &Path, include: &str) -> Result<PathBuf, std::io::Error> {
        Ok(Self::normalize_path(&base.join(include)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, std::io::Error> {
        let normalized = Self::normalize_path(path);
        if self.files.contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(Self::not_found(&normalized))
        }
    }
}
