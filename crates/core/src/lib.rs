#![allow(clippy::result_large_err)]
//! udbcfg-core: reader for the block-structured game configuration language.
//!
//! Turns configuration files into an in-memory tree of named scopes holding
//! typed scalars, executing `include()` directives along the way.
//!
//! # Pipeline
//!
//! path -> lines ([`SourceProvider`]) -> [`reader::CharSource`] ->
//! tokenizer -> string pass -> comment pass -> keyword pass -> cleaning pass
//! ([`lexer::lex`]) -> parser/loader ([`Loader`]) -> [`Scope`] tree, with
//! completed files memoized in a [`LoadCache`].
//!
//! # Public API
//!
//! - [`load_file()`] / [`load_file_with_provider()`] -- load a root file and its includes
//! - [`parse_str()`] -- parse one in-memory document
//! - [`Scope`], [`Value`] -- the resulting tree
//! - [`render()`] -- canonical text form of a tree
//! - [`ConfigError`] -- every failure a load can produce

pub mod cache;
pub mod error;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod reader;
pub mod render;
pub mod scope;
pub mod source;
pub mod token;

// ── Convenience re-exports: key types ────────────────────────────────

pub use cache::LoadCache;
pub use error::ConfigError;
pub use loader::Loader;
pub use scope::{Scope, ScopeError, Value};
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use token::{SourceLocation, Token, TokenKind};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use lexer::lex;
pub use loader::{load_file, load_file_with_provider, parse_str};
pub use render::render;
