//! Combines adjacent identifier tokens into keywords.
//!
//! Slashes join a keyword once it has started, so path-like names such as
//! `textures/flats` survive as one identifier.

use crate::token::{Token, TokenKind};

pub fn process(tokens: Vec<Token>) -> Vec<Token> {
    let mut processed = Vec::with_capacity(tokens.len());
    let mut run: Option<(Token, String)> = None;

    for token in tokens {
        let kind = token.kind();
        if kind.is_identifier() || (kind == TokenKind::Slash && run.is_some()) {
            match run.as_mut() {
                Some((_, text)) => text.push_str(token.text()),
                None => {
                    let text = token.text().to_owned();
                    run = Some((token, text));
                }
            }
            continue;
        }

        if let Some((first, text)) = run.take() {
            processed.push(first.replace(TokenKind::Other, text));
        }
        processed.push(token);
    }

    if let Some((first, text)) = run {
        processed.push(first.replace(TokenKind::Other, text));
    }

    processed
}
