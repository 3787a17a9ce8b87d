use crate::token::{Token, TokenKind};

/// Drop whitespace, newlines, comments and skipped control characters.
pub fn process(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| {
            !matches!(
                t.kind(),
                TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment | TokenKind::Skip
            )
        })
        .collect()
}
