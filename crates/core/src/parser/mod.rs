//! Recursive-descent parser over the cleaned token stream of one file.
//!
//! Blocks are tracked on an explicit scope stack: `name {` pushes a fresh
//! scope, `}` pops it and merges it into the enclosing one. `include(...)`
//! hands off to the [`Loader`], which owns the include chain and the cache.

use crate::error::ConfigError;
use crate::loader::Loader;
use crate::scope::{Scope, Value};
use crate::token::{Token, TokenKind};

pub mod literal;

// ──────────────────────────────────────────────
// Token cursor
// ──────────────────────────────────────────────

struct TokenCursor {
    tokens: std::vec::IntoIter<Token>,
}

impl TokenCursor {
    fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// The next token, or an end-of-file error located at `after`.
    fn expect(&mut self, after: &Token, expecting: &str) -> Result<Token, ConfigError> {
        self.tokens.next().ok_or_else(|| ConfigError::UnexpectedEof {
            location: after.location(),
            expecting: expecting.to_owned(),
        })
    }

    /// The next token if it has `kind`. End of input is reported as
    /// `expecting`, a wrong token as `expected`.
    fn expect_kind(
        &mut self,
        after: &Token,
        kind: TokenKind,
        expecting: &str,
        expected: &str,
    ) -> Result<Token, ConfigError> {
        let token = self.expect(after, expecting)?;
        if token.kind() == kind {
            Ok(token)
        } else {
            Err(ConfigError::syntax(token.location(), expected, &token))
        }
    }
}

// ──────────────────────────────────────────────
// Scope stack
// ──────────────────────────────────────────────

/// The file's root scope plus every block still open, innermost last.
struct ScopeStack {
    root: Scope,
    open: Vec<(Token, Scope)>,
}

impl ScopeStack {
    fn current(&mut self) -> &mut Scope {
        match self.open.last_mut() {
            Some((_, scope)) => scope,
            None => &mut self.root,
        }
    }

    fn depth(&self) -> usize {
        self.open.len()
    }

    fn open(&mut self, name: Token) -> Result<(), ConfigError> {
        let scope = Scope::new(name.text())?;
        self.open.push((name, scope));
        Ok(())
    }

    /// Close the innermost block and merge it into its parent. Returns `false`
    /// if no block is open.
    fn close(&mut self) -> Result<bool, ConfigError> {
        match self.open.pop() {
            Some((_, block)) => {
                self.current().put_scope(block)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn finish(self) -> Result<Scope, ConfigError> {
        match self.open.last() {
            Some((name, _)) => Err(ConfigError::UnexpectedEof {
                location: name.location(),
                expecting: format!("block '{}'", name.text()),
            }),
            None => Ok(self.root),
        }
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub(crate) struct Parser<'l, 'a> {
    loader: &'l mut Loader<'a>,
    cursor: TokenCursor,
    scopes: ScopeStack,
}

impl<'l, 'a> Parser<'l, 'a> {
    pub(crate) fn new(loader: &'l mut Loader<'a>, tokens: Vec<Token>, root: Scope) -> Self {
        Parser {
            loader,
            cursor: TokenCursor {
                tokens: tokens.into_iter(),
            },
            scopes: ScopeStack {
                root,
                open: Vec::new(),
            },
        }
    }

    /// Parse every statement and return the populated root scope.
    pub(crate) fn parse(mut self) -> Result<Scope, ConfigError> {
        while let Some(token) = self.cursor.next() {
            match token.kind() {
                TokenKind::Semicolon => continue,
                TokenKind::Other => self.parse_entry(token)?,
                TokenKind::BraceClose => {
                    if !self.scopes.close()? {
                        return Err(ConfigError::syntax(
                            token.location(),
                            "an identifier",
                            &token,
                        ));
                    }
                }
                _ => {
                    let expected = if self.scopes.depth() > 0 {
                        "an identifier or \"}\""
                    } else {
                        "an identifier"
                    };
                    return Err(ConfigError::syntax(token.location(), expected, &token));
                }
            }
        }
        self.scopes.finish()
    }

    fn parse_entry(&mut self, name: Token) -> Result<(), ConfigError> {
        let token = self.cursor.expect(&name, "an entry")?;

        match token.kind() {
            TokenKind::Assign => self.parse_assignment(name, token),
            TokenKind::ParenOpen => self.parse_function(name, token),
            TokenKind::BraceOpen => self.scopes.open(name),
            TokenKind::Semicolon => {
                self.scopes.current().put(name.text(), Value::Null)?;
                Ok(())
            }
            _ => Err(ConfigError::syntax(
                token.location(),
                "\"=\", \"{\", \"(\" or \";\" after an identifier",
                &token,
            )),
        }
    }

    fn parse_assignment(&mut self, name: Token, assign: Token) -> Result<(), ConfigError> {
        let token = self.cursor.expect(&assign, "a variable assignment")?;

        // `key = ;` stores null
        if token.kind() == TokenKind::Semicolon {
            self.scopes.current().put(name.text(), Value::Null)?;
            return Ok(());
        }

        let value = literal::coerce(&token)?;
        self.scopes.current().put(name.text(), value)?;
        self.cursor
            .expect_kind(&token, TokenKind::Semicolon, "a variable assignment", "\";\"")?;
        Ok(())
    }

    fn parse_function(&mut self, name: Token, open: Token) -> Result<(), ConfigError> {
        let mut args = Vec::new();
        let mut want_value = true;
        let mut last = open;

        loop {
            let token = self.cursor.expect(&last, "a function call")?;
            match token.kind() {
                TokenKind::Str | TokenKind::Other if want_value => {
                    args.push(literal::coerce(&token)?);
                    want_value = false;
                }
                TokenKind::Comma if !want_value => want_value = true,
                TokenKind::ParenClose if !want_value || args.is_empty() => {
                    return self.call_function(&name, args);
                }
                _ => {
                    let expected = if want_value {
                        "a literal value"
                    } else {
                        "\",\" or \")\""
                    };
                    return Err(ConfigError::syntax(token.location(), expected, &token));
                }
            }
            last = token;
        }
    }

    fn call_function(&mut self, name: &Token, args: Vec<Value>) -> Result<(), ConfigError> {
        if name.text().eq_ignore_ascii_case("include") {
            self.call_include(name, args)
        } else {
            Err(ConfigError::UnknownFunction {
                location: name.location(),
                name: name.text().to_owned(),
            })
        }
    }

    /// `include(file)` or `include(file, "section.path")`: load `file` and merge
    /// its root scope, or the named nested scope, into the current scope.
    fn call_include(&mut self, name: &Token, args: Vec<Value>) -> Result<(), ConfigError> {
        let arg_error = |message: String| ConfigError::IncludeArguments {
            location: name.location(),
            message,
        };

        let (file, section) = match args.as_slice() {
            [file] => (file, None),
            [file, section] => (file, Some(section)),
            _ => {
                return Err(arg_error(format!(
                    "include() takes 1 or 2 arguments, got {}",
                    args.len()
                )))
            }
        };
        let file = file.as_str().ok_or_else(|| {
            arg_error(format!(
                "first argument of include() must be a string, got {}",
                file.type_name()
            ))
        })?;
        let section = match section {
            Some(value) => value.as_str().ok_or_else(|| {
                arg_error(format!(
                    "second argument of include() must be a string, got {}",
                    value.type_name()
                ))
            })?,
            None => "",
        };

        let path = file.replace('\\', "/");
        let included = self.loader.include(&path, name)?;

        let mut block: &Scope = &included;
        if !section.is_empty() {
            for part in section.split('.') {
                block = block
                    .get_scope(part)
                    .ok_or_else(|| ConfigError::MissingSection {
                        location: name.location(),
                        section: section.to_owned(),
                    })?;
            }
        }

        self.scopes.current().put_all(block)?;
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::error::ConfigError;
    use crate::loader::parse_str;
    use crate::scope::Value;

    #[test]
    fn end_to_end_root_cfg() {
        let root = parse_str("root.cfg", "a = 1; block { x = \"hi\"; }").unwrap();
        assert_eq!(root.name(), "root.cfg");
        assert_eq!(root.get("a"), Some(&Value::Int(1)));
        let block = root.get_scope("block").unwrap();
        assert_eq!(block.name(), "block");
        assert_eq!(block.get("x"), Some(&Value::String("hi".into())));
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn scalar_coercion_in_assignments() {
        let root = parse_str(
            "t.cfg",
            "b = true; n = ; i = 42; d = 3.5; f = 2.5f; s = \"42\"; z = null; bare;",
        )
        .unwrap();
        assert_eq!(root.get("b"), Some(&Value::Bool(true)));
        assert_eq!(root.get("n"), Some(&Value::Null));
        assert_eq!(root.get("i"), Some(&Value::Int(42)));
        assert_eq!(root.get("d"), Some(&Value::Float64(3.5)));
        assert_eq!(root.get("f"), Some(&Value::Float32(2.5)));
        assert_eq!(root.get("s"), Some(&Value::String("42".into())));
        assert_eq!(root.get("z"), Some(&Value::Null));
        assert_eq!(root.get("bare"), Some(&Value::Null));
    }

    #[test]
    fn repeated_blocks_merge() {
        let root = parse_str(
            "t.cfg",
            "things { a = 1; b = 2; }\nthings { b = 3; c { d = 4; } }\nthings { c { e = 5; } }",
        )
        .unwrap();
        let things = root.get_scope("things").unwrap();
        assert_eq!(things.get("a"), Some(&Value::Int(1)));
        assert_eq!(things.get("b"), Some(&Value::Int(3)));
        assert_eq!(root.lookup("things.c.d"), Some(&Value::Int(4)));
        assert_eq!(root.lookup("things.c.e"), Some(&Value::Int(5)));
    }

    #[test]
    fn nested_blocks_and_stray_semicolons() {
        let root = parse_str("t.cfg", ";; outer { ; inner { v = 1; }; } ;").unwrap();
        assert_eq!(root.lookup("outer.inner.v"), Some(&Value::Int(1)));
    }

    #[test]
    fn path_like_keys_survive() {
        let root = parse_str("t.cfg", "textures/flats { floor = 1; }").unwrap();
        assert!(root.get_scope("textures/flats").is_some());
    }

    #[test]
    fn unparsable_literal_is_a_syntax_error() {
        let err = parse_str("t.cfg", "x = hello;").unwrap_err();
        match err {
            ConfigError::Syntax {
                location, found, ..
            } => {
                assert_eq!(location.to_string(), "t.cfg:1:5");
                assert_eq!(found, "hello");
            }
            other => panic!("expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn missing_semicolon_is_reported_at_following_token() {
        let err = parse_str("t.cfg", "x = 1\ny = 2;").unwrap_err();
        match err {
            ConfigError::Syntax {
                location, expected, ..
            } => {
                assert_eq!(location.to_string(), "t.cfg:2:1");
                assert_eq!(expected, "\";\"");
            }
            other => panic!("expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn unexpected_eof_after_identifier() {
        let err = parse_str("t.cfg", "a = 1;\nlonely").unwrap_err();
        match err {
            ConfigError::UnexpectedEof { location, .. } => {
                assert_eq!(location.to_string(), "t.cfg:2:1");
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn unexpected_eof_after_assigned_value_names_the_assignment() {
        let err = parse_str("t.cfg", "a = 1;\nb = 2").unwrap_err();
        match err {
            ConfigError::UnexpectedEof {
                location,
                expecting,
            } => {
                assert_eq!(location.to_string(), "t.cfg:2:5");
                assert_eq!(expecting, "a variable assignment");
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn unclosed_block_is_unexpected_eof() {
        let err = parse_str("t.cfg", "outer {\n  inner {\n    a = 1;\n  }\n").unwrap_err();
        match err {
            ConfigError::UnexpectedEof {
                location,
                expecting,
            } => {
                assert_eq!(location.to_string(), "t.cfg:1:1");
                assert_eq!(expecting, "block 'outer'");
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
    }

    #[test]
    fn unmatched_closing_brace_is_rejected() {
        let err = parse_str("t.cfg", "a = 1; }").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { .. }), "{:?}", err);
    }

    #[test]
    fn statement_cannot_start_with_a_string() {
        let err = parse_str("t.cfg", "\"key\" = 1;").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { .. }), "{:?}", err);
    }

    #[test]
    fn unknown_function_is_fatal() {
        let err = parse_str("t.cfg", "  exec(\"rm\");").unwrap_err();
        match err {
            ConfigError::UnknownFunction { location, name } => {
                assert_eq!(name, "exec");
                assert_eq!(location.to_string(), "t.cfg:1:3");
            }
            other => panic!("expected UnknownFunction, got {:?}", other),
        }
    }

    #[test]
    fn include_arity_is_checked() {
        let err = parse_str("t.cfg", "include();").unwrap_err();
        assert!(
            matches!(err, ConfigError::IncludeArguments { .. }),
            "{:?}",
            err
        );
        let err = parse_str("t.cfg", "include(\"a\", \"b\", \"c\");").unwrap_err();
        assert!(
            matches!(err, ConfigError::IncludeArguments { .. }),
            "{:?}",
            err
        );
    }

    #[test]
    fn include_requires_string_arguments() {
        let err = parse_str("t.cfg", "Include(42);").unwrap_err();
        match err {
            ConfigError::IncludeArguments { message, .. } => {
                assert!(message.contains("first argument"), "{}", message);
            }
            other => panic!("expected IncludeArguments, got {:?}", other),
        }
    }

    #[test]
    fn malformed_argument_lists_are_syntax_errors() {
        for src in ["include(\"a\",);", "include(,\"a\");", "include(\"a\" \"b\");"] {
            let err = parse_str("t.cfg", src).unwrap_err();
            assert!(matches!(err, ConfigError::Syntax { .. }), "{}: {:?}", src, err);
        }
    }

    #[test]
    fn include_of_missing_file_is_an_io_error() {
        let err = parse_str("t.cfg", "include(\"nowhere.cfg\");").unwrap_err();
        assert!(matches!(err, ConfigError::IncludeIo { .. }), "{:?}", err);
    }
}
