//! Located tokens shared by the tokenizer, the token passes and the parser.

use std::fmt;
use std::rc::Rc;

/// Token categories.
///
/// The tokenizer only produces the primitive kinds. `Str` and `Comment` are
/// produced by the string and comment passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Newline,
    Whitespace,
    Slash,
    Asterisk,
    Quote,
    ParenOpen,
    ParenClose,
    BraceOpen,
    BraceClose,
    Assign,
    Comma,
    Semicolon,
    /// Identifier-class text: everything not covered by another category.
    Other,
    /// Control characters such as carriage return. Dropped by the cleaning pass.
    Skip,

    // Produced by later passes only
    Str,
    Comment,
}

impl TokenKind {
    /// Whether two adjacent characters of this kind merge into one token.
    pub fn combinable(self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Whitespace | TokenKind::Other | TokenKind::Skip
        )
    }

    /// Whether the keyword pass may start or extend a run with this kind.
    pub fn is_identifier(self) -> bool {
        self == TokenKind::Other
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Newline => "newline",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Slash => "slash",
            TokenKind::Asterisk => "asterisk",
            TokenKind::Quote => "quote",
            TokenKind::ParenOpen => "paren-open",
            TokenKind::ParenClose => "paren-close",
            TokenKind::BraceOpen => "brace-open",
            TokenKind::BraceClose => "brace-close",
            TokenKind::Assign => "assignment",
            TokenKind::Comma => "list-separator",
            TokenKind::Semicolon => "statement-terminator",
            TokenKind::Other => "identifier",
            TokenKind::Skip => "skip",
            TokenKind::Str => "string",
            TokenKind::Comment => "comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 1-based position inside one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// A position together with the name of the source it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub source: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// An immutable, classified span of source text stamped with the location of
/// its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    source: Rc<str>,
    position: Position,
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(
        source: Rc<str>,
        position: Position,
        kind: TokenKind,
        text: impl Into<String>,
    ) -> Self {
        Token {
            source,
            position,
            kind,
            text: text.into(),
        }
    }

    /// Build a new token with a different kind and text at this token's location.
    pub fn replace(&self, kind: TokenKind, text: impl Into<String>) -> Token {
        Token::new(Rc::clone(&self.source), self.position, kind, text)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            source: self.source.to_string(),
            line: self.position.line,
            column: self.position.column,
        }
    }

    /// The text with newlines, tabs and quotes escaped, for error messages.
    pub fn escaped_text(&self) -> String {
        escape_for_display(&self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} ({}) \"{}\"",
            self.source,
            self.position.line,
            self.position.column,
            self.kind,
            self.escaped_text()
        )
    }
}

pub(crate) fn escape_for_display(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}
