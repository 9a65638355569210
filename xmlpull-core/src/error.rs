//! Errors surfaced by the pull parser.
//!
//! Every failure of the underlying reader is translated into one of these
//! kinds; the reader's own error type never reaches callers.

use std::fmt;

use thiserror::Error;

use crate::source::Location;

/// Capabilities the pull-parser contract names but this parser does not provide.
///
/// Calls to them fail with [`Error::Unsupported`] in every parser state, so an
/// unsupported answer can never be mistaken for a computed one (depth 0, no
/// entity, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Element nesting depth (`getDepth`)
    Depth,
    /// Fine-grained token stream (`nextToken`)
    NextToken,
    /// Text as a character buffer with offsets (`getTextCharacters`)
    TextCharacters,
    /// Whether the start tag was written as `<a/>` (`isEmptyElementTag`)
    EmptyElementTag,
    /// Whether an attribute was defaulted from a DTD (`isAttributeDefault`)
    AttributeDefault,
    /// Custom entity definitions (`defineEntityReplacementText`)
    EntityReplacementText,
}

impl Capability {
    /// Get a human-readable name for this capability.
    pub fn message(self) -> &'static str {
        match self {
            Self::Depth => "element depth",
            Self::NextToken => "token-level navigation",
            Self::TextCharacters => "text character buffers",
            Self::EmptyElementTag => "empty element tag detection",
            Self::AttributeDefault => "defaulted attribute detection",
            Self::EntityReplacementText => "entity replacement text",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Pull parser error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unrecognized feature, or configuration changed after binding.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The input could not be bound (unknown encoding, unreadable source, bad prolog).
    #[error("cannot bind input: {0}")]
    Binding(String),

    /// Malformed input detected while advancing.
    #[error("syntax error at {location}: {message}")]
    Syntax { message: String, location: Location },

    /// A navigation precondition does not hold at the current position.
    #[error("{message} (at {location})")]
    State { message: String, location: Location },

    #[error("unsupported operation: {0}")]
    Unsupported(Capability),
}

/// Error category, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Binding,
    Syntax,
    State,
    Unsupported,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Binding(_) => ErrorKind::Binding,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::State { .. } => ErrorKind::State,
            Error::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn state(message: impl Into<String>, location: Location) -> Self {
        Error::State {
            message: message.into(),
            location,
        }
    }

    /// Location the error was raised at, when the parser was bound.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Syntax { location, .. } | Error::State { location, .. } if location.is_known() => {
                Some(*location)
            }
            _ => None,
        }
    }
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
