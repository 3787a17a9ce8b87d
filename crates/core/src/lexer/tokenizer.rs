//! Character classification and maximal-munch merging into primitive tokens.

use crate::reader::CharSource;
use crate::token::{Position, Token, TokenKind};

struct Pending {
    kind: TokenKind,
    position: Position,
    text: String,
}

/// Split the whole character stream into primitive tokens.
///
/// Consecutive characters of the same combinable kind form one token; every
/// other character starts a new one. Each token carries the position of its
/// first character.
pub fn tokenize(reader: &mut CharSource) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(1024);
    let mut pending: Option<Pending> = None;

    while let Some(c) = reader.next_char() {
        let kind = classify(c);

        if let Some(p) = pending.as_mut() {
            if p.kind == kind && kind.combinable() {
                p.text.push(c);
                continue;
            }
        }

        if let Some(p) = pending.take() {
            tokens.push(Token::new(reader.source().clone(), p.position, p.kind, p.text));
        }

        reader.mark();
        if let Some(position) = reader.marked() {
            pending = Some(Pending {
                kind,
                position,
                text: c.to_string(),
            });
        }
    }

    if let Some(p) = pending {
        tokens.push(Token::new(reader.source().clone(), p.position, p.kind, p.text));
    }

    tokens
}

/// Control characters and everything outside printable ASCII (including a
/// byte-order mark) are [`TokenKind::Skip`]. Inside a string literal their
/// text is still kept by the string pass.
pub fn classify(c: char) -> TokenKind {
    match c {
        '\n' => TokenKind::Newline,
        ' ' | '\t' => TokenKind::Whitespace,
        c if c < ' ' || u32::from(c) >= 127 => TokenKind::Skip,
        '/' => TokenKind::Slash,
        '*' => TokenKind::Asterisk,
        '"' => TokenKind::Quote,
        '(' => TokenKind::ParenOpen,
        ')' => TokenKind::ParenClose,
        '{' => TokenKind::BraceOpen,
        '}' => TokenKind::BraceClose,
        '=' => TokenKind::Assign,
        ',' => TokenKind::Comma,
        ';' => TokenKind::Semicolon,
        _ => TokenKind::Other,
    }
}
