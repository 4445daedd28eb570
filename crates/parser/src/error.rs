// ABOUTME: Error types for SERP capture parsing.
// ABOUTME: Splits fatal configuration, filename, and data-shape failures into ParseError variants.

use std::path::PathBuf;

use thiserror::Error;

use crate::engines::{Engine, ResultKind};

/// Errors that abort a parse call. Selector mismatches and best-effort
/// failures are deliberately not here; they surface as [`crate::Warning`]s
/// or absent values instead.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The requested (engine, result kind) pair has no registry entry.
    #[error("unsupported engine: no rules registered for {engine} {kind} results")]
    UnsupportedEngine { engine: Engine, kind: ResultKind },

    /// The parser was constructed with an unusable combination of inputs.
    #[error("parser configuration: {0}")]
    Config(String),

    /// A rule's CSS selector failed to compile.
    #[error("invalid CSS selector for field {field}: {selector:?}")]
    Selector { field: String, selector: String },

    /// Two rules in one rule set share a field name.
    #[error("duplicate field name in rule set: {0}")]
    DuplicateField(String),

    /// A capture filename does not follow the
    /// `<engine>_<query>_..._<resulttype>_..._<timestamp>.html` layout.
    #[error("capture filename {name:?}: {reason}")]
    Filename { name: String, reason: String },

    /// An attribute rule matched an element that lacks the attribute.
    #[error("attribute {attribute:?} missing on element matched for field {field}")]
    MissingAttribute { field: String, attribute: String },

    /// Reading a capture file or directory failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Creates a Config error with a custom message.
    pub fn config(msg: impl Into<String>) -> Self {
        ParseError::Config(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParseError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn filename(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::Filename {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a configuration-time error.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ParseError::UnsupportedEngine { .. }
                | ParseError::Config(_)
                | ParseError::Selector { .. }
                | ParseError::DuplicateField(_)
        )
    }
}
