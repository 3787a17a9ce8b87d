//! Canonical pretty-printer.
//!
//! Renders a scope back into the configuration syntax. Parsing the output
//! reproduces the same keys, nesting and scalar values; comments and the
//! original spelling of numbers are not preserved.
//!
//! The language has no escape for `"`. A string value containing a double
//! quote can only come from building a [`Scope`] in code; it is written
//! verbatim with a warning, and the output will not parse back.

use std::fmt::{self, Write};

use tracing::warn;

use crate::scope::{Scope, Value};

const INDENT: &str = "    ";

/// Render the entries of `scope`. The root's own name is not printed.
///
/// See the module docs for strings containing `"`.
pub fn render(scope: &Scope) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_entries(&mut out, scope, 0);
    out
}

pub(crate) fn write_entries<W: Write>(out: &mut W, scope: &Scope, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);

    for (key, value) in scope {
        match value {
            Value::Null => writeln!(out, "{}{};", indent, key)?,
            Value::Bool(b) => writeln!(out, "{}{} = {};", indent, key, b)?,
            Value::Int(n) => writeln!(out, "{}{} = {};", indent, key, n)?,
            Value::Float32(f) => writeln!(out, "{}{} = {:?}f;", indent, key, f)?,
            Value::Float64(f) => writeln!(out, "{}{} = {};", indent, key, format_f64(*f))?,
            Value::String(s) => {
                if s.contains('"') {
                    warn!(key = %key, "string value contains a double quote and will not parse back");
                }
                writeln!(out, "{}{} = \"{}\";", indent, key, escape(s))?
            }
            Value::Scope(inner) => {
                writeln!(out, "{}{} {{", indent, key)?;
                write_entries(out, inner, depth + 1)?;
                writeln!(out, "{}}}", indent)?;
            }
        }
    }

    Ok(())
}

/// Debug formatting always keeps a `.` or an exponent, so the text never
/// re-parses as an integer.
fn format_f64(f: f64) -> String {
    if f == f64::INFINITY {
        "infinity".to_owned()
    } else if f == f64::NEG_INFINITY {
        "-infinity".to_owned()
    } else {
        format!("{:?}", f)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}
