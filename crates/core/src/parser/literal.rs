//! Scalar coercion of literal tokens.

use crate::error::ConfigError;
use crate::scope::Value;
use crate::token::{Token, TokenKind};

pub(crate) const LITERAL_EXPECTED: &str = "a string, a number, a boolean, or null";

/// Turn a literal token into a value. String tokens are taken verbatim;
/// identifier tokens go through [`parse_scalar`].
pub fn coerce(token: &Token) -> Result<Value, ConfigError> {
    match token.kind() {
        TokenKind::Str => Ok(Value::String(token.text().to_owned())),
        TokenKind::Other => parse_scalar(token.text())
            .ok_or_else(|| ConfigError::syntax(token.location(), LITERAL_EXPECTED, token)),
        _ => Err(ConfigError::syntax(token.location(), LITERAL_EXPECTED, token)),
    }
}

/// Coerce bare-word text, trying in order: null, boolean, 64-bit integer,
/// 32-bit float (trailing `f`/`F`), 64-bit float.
pub fn parse_scalar(text: &str) -> Option<Value> {
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return Some(Value::Null);
    }
    if text.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Int(n));
    }
    if let Some(number) = text.strip_suffix(|c| c == 'f' || c == 'F') {
        return number.parse::<f32>().ok().map(Value::Float32);
    }
    text.parse::<f64>().ok().map(Value::Float64)
}
