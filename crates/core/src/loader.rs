//! File loading: the include chain, cycle detection and the load cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::LoadCache;
use crate::error::ConfigError;
use crate::lexer;
use crate::parser::Parser;
use crate::scope::Scope;
use crate::source::{FileSystemProvider, InMemoryProvider, SourceProvider};
use crate::token::Token;

/// Load the root configuration file and everything it includes.
///
/// Uses the default [`FileSystemProvider`] for file I/O.
pub fn load_file(root: &Path, cache: &mut LoadCache) -> Result<Arc<Scope>, ConfigError> {
    load_file_with_provider(root, &FileSystemProvider, cache)
}

/// Load the root configuration file and everything it includes using the
/// given [`SourceProvider`] for file I/O.
///
/// Files already present in `cache` are not read again; every file parsed by
/// this call is added to it.
pub fn load_file_with_provider(
    root: &Path,
    provider: &dyn SourceProvider,
    cache: &mut LoadCache,
) -> Result<Arc<Scope>, ConfigError> {
    Loader::new(provider, cache).load(root)
}

/// Parse a single in-memory document. The root scope is named `source_name`.
///
/// There is no filesystem behind the document, so any `include()` fails with
/// [`ConfigError::IncludeIo`].
pub fn parse_str(source_name: &str, text: &str) -> Result<Scope, ConfigError> {
    let provider = InMemoryProvider::default();
    let mut cache = LoadCache::new();
    let mut loader = Loader::new(&provider, &mut cache);
    let lines: Vec<&str> = text.lines().collect();
    loader.parse_lines(Path::new(source_name), &lines)
}

/// One in-flight load operation.
///
/// Owns the include chain (the files currently being parsed, root first) and
/// borrows the provider and cache it was created with.
pub struct Loader<'a> {
    provider: &'a dyn SourceProvider,
    cache: &'a mut LoadCache,
    file_stack: Vec<PathBuf>,
}

impl<'a> Loader<'a> {
    pub fn new(provider: &'a dyn SourceProvider, cache: &'a mut LoadCache) -> Self {
        Loader {
            provider,
            cache,
            file_stack: Vec::with_capacity(8),
        }
    }

    /// The files currently being parsed, root first. Empty between loads.
    pub fn include_chain(&self) -> &[PathBuf] {
        &self.file_stack
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<Scope>, ConfigError> {
        let file = self
            .provider
            .canonicalize(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_owned(),
                source,
            })?;
        self.load_resolved(file)
    }

    /// Resolve and load an included file on behalf of the parser.
    ///
    /// Relative paths are anchored at the directory of the *root* file of the
    /// current include chain, not at the file containing the `include()`.
    pub(crate) fn include(&mut self, include: &str, at: &Token) -> Result<Arc<Scope>, ConfigError> {
        let base = self
            .file_stack
            .first()
            .and_then(|root| root.parent())
            .unwrap_or(Path::new("."))
            .to_owned();

        let resolved = self
            .provider
            .resolve_include(&base, include)
            .map_err(|source| ConfigError::IncludeIo {
                location: at.location(),
                path: PathBuf::from(include),
                source,
            })?;
        let file = self
            .provider
            .canonicalize(&resolved)
            .map_err(|source| ConfigError::IncludeIo {
                location: at.location(),
                path: resolved.clone(),
                source,
            })?;

        if self.file_stack.contains(&file) {
            return Err(ConfigError::CircularInclude {
                location: at.location(),
                chain: self.file_stack.clone(),
                path: file,
            });
        }

        self.load_resolved(file).map_err(|e| match e {
            ConfigError::Io { path, source } => ConfigError::IncludeIo {
                location: at.location(),
                path,
                source,
            },
            other => other,
        })
    }

    fn load_resolved(&mut self, file: PathBuf) -> Result<Arc<Scope>, ConfigError> {
        if let Some(scope) = self.cache.get(&file) {
            debug!(path = %file.display(), "configuration file served from cache");
            return Ok(scope);
        }

        info!(path = %file.display(), "loading configuration file");

        let lines = self
            .provider
            .read_lines(&file)
            .map_err(|source| ConfigError::Io {
                path: file.clone(),
                source,
            })?;
        let scope = Arc::new(self.parse_lines(&file, &lines)?);

        self.cache.put(file, Arc::clone(&scope));
        Ok(scope)
    }

    /// Run the token pipeline and the parser over one file's lines with the
    /// file pushed onto the include chain. The chain is popped again whether
    /// parsing succeeds or not.
    pub(crate) fn parse_lines<S: AsRef<str>>(
        &mut self,
        file: &Path,
        lines: &[S],
    ) -> Result<Scope, ConfigError> {
        self.file_stack.push(file.to_owned());
        let result = self.parse_tokens(file, lines);
        self.file_stack.pop();
        result
    }

    fn parse_tokens<S: AsRef<str>>(&mut self, file: &Path, lines: &[S]) -> Result<Scope, ConfigError> {
        let name = source_name(file);
        let tokens = lexer::lex(&name, lines)?;
        let root = Scope::new(name)?;
        Parser::new(self, tokens, root).parse()
    }
}

/// The file name, used both as the root scope's name and as the token source.
fn source_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string())
}
