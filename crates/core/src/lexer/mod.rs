//! Lexical pipeline: characters -> primitive tokens -> strings -> comments ->
//! keywords -> cleaned stream.
//!
//! The order of the passes matters. Strings resolve before comments so `//`
//! inside a literal stays literal, and before keywords so quoted text never
//! merges into an identifier. Cleaning runs last because line comments end at
//! newline tokens.

pub mod clean;
pub mod comments;
pub mod keywords;
pub mod strings;
pub mod tokenizer;

use tracing::debug;

use crate::error::ConfigError;
use crate::reader::CharSource;
use crate::token::Token;

/// Run the full token pipeline over the lines of one source.
pub fn lex<S: AsRef<str>>(source: &str, lines: &[S]) -> Result<Vec<Token>, ConfigError> {
    let mut reader = CharSource::new(source, lines);

    let tokens = tokenizer::tokenize(&mut reader);
    debug!(source, count = tokens.len(), "tokenized");

    let tokens = strings::process(tokens)?;
    let tokens = comments::process(tokens)?;
    let tokens = keywords::process(tokens);
    let tokens = clean::process(tokens);
    debug!(source, count = tokens.len(), "cleaned token stream");

    Ok(tokens)
}
