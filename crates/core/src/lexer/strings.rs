//! Merges everything between a pair of quote markers into one string token.

use tracing::warn;

use crate::error::ConfigError;
use crate::token::{SourceLocation, Token, TokenKind};

/// Replace every `" ... "` span with a single [`TokenKind::Str`] token located
/// at the opening quote. The raw text of the enclosed tokens is concatenated
/// and then unescaped.
pub fn process(tokens: Vec<Token>) -> Result<Vec<Token>, ConfigError> {
    let mut processed = Vec::with_capacity(tokens.len());
    let mut open: Option<Token> = None;
    let mut contents = String::with_capacity(80);

    for token in tokens {
        match open.take() {
            Some(quote) if token.kind() == TokenKind::Quote => {
                let text = unescape(&contents, &quote.location());
                processed.push(quote.replace(TokenKind::Str, text));
                contents.clear();
            }
            Some(quote) => {
                contents.push_str(token.text());
                open = Some(quote);
            }
            None if token.kind() == TokenKind::Quote => open = Some(token),
            None => processed.push(token),
        }
    }

    if let Some(quote) = open {
        return Err(ConfigError::UnterminatedString {
            location: quote.location(),
        });
    }

    Ok(processed)
}

/// Decode `\\` and `\n`. Any other escape is kept as written.
fn unescape(raw: &str, location: &SourceLocation) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some(other) => {
                warn!(%location, "unrecognized escape sequence \\{} left undecoded", other);
                out.push('\\');
            }
            None => out.push('\\'),
        }
    }

    out
}
