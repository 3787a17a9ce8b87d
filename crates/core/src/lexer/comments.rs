//! Strips `// line` and `/* block */` comments.
//!
//! Runs after the string pass, so slashes inside string literals are already
//! hidden inside string tokens.

use crate::error::ConfigError;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    None,
    /// One slash seen.
    Undecided,
    Line,
    Block,
    BlockMaybeEnd,
}

/// Collapse every comment into a single [`TokenKind::Comment`] token located at
/// its first slash. The newline ending a line comment is kept.
pub fn process(tokens: Vec<Token>) -> Result<Vec<Token>, ConfigError> {
    let mut processed = Vec::with_capacity(tokens.len());
    let mut state = CommentState::None;
    let mut text = String::with_capacity(1024);
    let mut first: Option<Token> = None;

    for token in tokens {
        let kind = token.kind();

        state = match state {
            CommentState::None => {
                if kind == TokenKind::Slash {
                    text.push_str(token.text());
                    first = Some(token);
                    CommentState::Undecided
                } else {
                    processed.push(token);
                    CommentState::None
                }
            }
            CommentState::Undecided => match kind {
                TokenKind::Slash => {
                    text.push_str(token.text());
                    CommentState::Line
                }
                TokenKind::Asterisk => {
                    text.push_str(token.text());
                    CommentState::Block
                }
                _ => {
                    // a lone slash: not a comment
                    processed.extend(first.take());
                    text.clear();
                    processed.push(token);
                    CommentState::None
                }
            },
            CommentState::Line => {
                if kind == TokenKind::Newline {
                    close(&mut first, &mut text, &mut processed);
                    processed.push(token);
                    CommentState::None
                } else {
                    text.push_str(token.text());
                    CommentState::Line
                }
            }
            CommentState::Block => {
                text.push_str(token.text());
                if kind == TokenKind::Asterisk {
                    CommentState::BlockMaybeEnd
                } else {
                    CommentState::Block
                }
            }
            CommentState::BlockMaybeEnd => {
                text.push_str(token.text());
                match kind {
                    TokenKind::Slash => {
                        close(&mut first, &mut text, &mut processed);
                        CommentState::None
                    }
                    TokenKind::Asterisk => CommentState::BlockMaybeEnd,
                    _ => CommentState::Block,
                }
            }
        };
    }

    match state {
        CommentState::None => {}
        CommentState::Undecided => processed.extend(first.take()),
        CommentState::Line => close(&mut first, &mut text, &mut processed),
        CommentState::Block | CommentState::BlockMaybeEnd => {
            if let Some(start) = first {
                return Err(ConfigError::UnterminatedComment {
                    location: start.location(),
                });
            }
        }
    }

    Ok(processed)
}

fn close(first: &mut Option<Token>, text: &mut String, out: &mut Vec<Token>) {
    if let Some(start) = first.take() {
        out.push(start.replace(TokenKind::Comment, std::mem::take(text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{strings, tokenizer::tokenize};
    use crate::reader::CharSource;

    fn comments(lines: &[&str]) -> Result<Vec<Token>, ConfigError> {
        let mut reader = CharSource::new("t.cfg", lines);
        process(strings::process(tokenize(&mut reader))?)
    }

    fn non_trivia(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens
            .iter()
            .filter(|t| !matches!(t.kind(), TokenKind::Whitespace | TokenKind::Newline))
            .map(|t| (t.kind(), t.text()))
            .collect()
    }

    #[test]
    fn line_comment_runs_to_newline() {
        let tokens = comments(&["a; // note here", "b;"]).unwrap();
        assert_eq!(
            non_trivia(&tokens),
            vec![
                (TokenKind::Other, "a"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Comment, "// note here"),
                (TokenKind::Other, "b"),
                (TokenKind::Semicolon, ";"),
            ]
        );
        assert!(tokens.iter().any(|t| t.kind() == TokenKind::Newline));
    }

    #[test]
    fn line_comment_at_end_of_input_is_closed() {
        let tokens = comments(&["a; // trailing"]).unwrap();
        assert_eq!(tokens.last().unwrap().kind(), TokenKind::Comment);
    }

    #[test]
    fn block_comment_spans_lines() {
        let tokens = comments(&["a /* one", "two **/ b"]).unwrap();
        assert_eq!(
            non_trivia(&tokens),
            vec![
                (TokenKind::Other, "a"),
                (TokenKind::Comment, "/* one\ntwo **/"),
                (TokenKind::Other, "b"),
            ]
        );
    }

    #[test]
    fn lone_slash_is_reemitted() {
        let tokens = comments(&["a/b"]).unwrap();
        assert_eq!(
            non_trivia(&tokens),
            vec![
                (TokenKind::Other, "a"),
                (TokenKind::Slash, "/"),
                (TokenKind::Other, "b"),
            ]
        );
    }

    #[test]
    fn slash_inside_string_is_not_a_comment() {
        let tokens = comments(&[r#"path = "a//b";"#]).unwrap();
        assert!(tokens.iter().all(|t| t.kind() != TokenKind::Comment));
        assert!(tokens
            .iter()
            .any(|t| t.kind() == TokenKind::Str && t.text() == "a//b"));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let err = comments(&["a;", "  /* never closed"]).unwrap_err();
        match err {
            ConfigError::UnterminatedComment { location } => {
                assert_eq!(location.to_string(), "t.cfg:2:3");
            }
            other => panic!("expected UnterminatedComment, got {:?}", other),
        }
    }

    #[test]
    fn slash_star_slash_does_not_close() {
        let err = comments(&["/*/ x"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnterminatedComment { .. }));
    }
}
