use std::path::{Path, PathBuf};

use crate::scope::ScopeError;
use crate::token::SourceLocation;

/// A load error. Every variant except [`ConfigError::Io`] and
/// [`ConfigError::Scope`] points at a location in some source file.
///
/// All of them are fatal for the top-level load that produced them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unexpected end of file while parsing {expecting}, at {location}")]
    UnexpectedEof {
        location: SourceLocation,
        expecting: String,
    },

    #[error("syntax error at {location}. Expecting {expected}, but found: \"{found}\" ({found_kind})")]
    Syntax {
        location: SourceLocation,
        expected: String,
        found: String,
        found_kind: String,
    },

    #[error("unterminated string starting at {location}")]
    UnterminatedString { location: SourceLocation },

    #[error("unterminated block comment starting at {location}")]
    UnterminatedComment { location: SourceLocation },

    #[error("unknown function: {name}, at {location}")]
    UnknownFunction {
        location: SourceLocation,
        name: String,
    },

    #[error("{message}, at {location}")]
    IncludeArguments {
        location: SourceLocation,
        message: String,
    },

    #[error("include is missing requested section '{section}', at {location}")]
    MissingSection {
        location: SourceLocation,
        section: String,
    },

    #[error("circular include chain detected: {}, at {location}", format_chain(.chain, .path))]
    CircularInclude {
        location: SourceLocation,
        chain: Vec<PathBuf>,
        path: PathBuf,
    },

    #[error("unable to load configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read include file {}: {source}, at {location}", .path.display())]
    IncludeIo {
        location: SourceLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

fn format_chain(chain: &[PathBuf], path: &Path) -> String {
    chain
        .iter()
        .map(PathBuf::as_path)
        .chain(std::iter::once(path))
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl ConfigError {
    pub(crate) fn syntax(
        location: SourceLocation,
        expected: impl Into<String>,
        found: &crate::token::Token,
    ) -> Self {
        ConfigError::Syntax {
            location,
            expected: expected.into(),
            found: found.escaped_text(),
            found_kind: found.kind().to_string(),
        }
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::UnexpectedEof { .. } => "unexpected_eof",
            ConfigError::Syntax { .. } => "syntax",
            ConfigError::UnterminatedString { .. } => "unterminated_string",
            ConfigError::UnterminatedComment { .. } => "unterminated_comment",
            ConfigError::UnknownFunction { .. } => "unknown_function",
            ConfigError::IncludeArguments { .. } => "include_arguments",
            ConfigError::MissingSection { .. } => "missing_section",
            ConfigError::CircularInclude { .. } => "circular_include",
            ConfigError::Io { .. } => "io",
            ConfigError::IncludeIo { .. } => "include_io",
            ConfigError::Scope(_) => "scope",
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            ConfigError::UnexpectedEof { location, .. }
            | ConfigError::Syntax { location, .. }
            | ConfigError::UnterminatedString { location }
            | ConfigError::UnterminatedComment { location }
            | ConfigError::UnknownFunction { location, .. }
            | ConfigError::IncludeArguments { location, .. }
            | ConfigError::MissingSection { location, .. }
            | ConfigError::CircularInclude { location, .. }
            | ConfigError::IncludeIo { location, .. } => Some(location),
            ConfigError::Io { .. } | ConfigError::Scope(_) => None,
        }
    }

    /// Serialize to a flat JSON object. Missing location fields are null.
    pub fn to_json_value(&self) -> serde_json::Value {
        let location = self.location();
        let file = match (location, self) {
            (Some(loc), _) => Some(loc.source.clone()),
            (None, ConfigError::Io { path, .. }) => Some(path.display().to_string()),
            _ => None,
        };
        serde_json::json!({
            "column":  location.map(|l| l.column),
            "file":    file,
            "kind":    self.kind(),
            "line":    location.map(|l| l.line),
            "message": self.to_string(),
        })
    }
}
