use std::fmt;
use thiserror::Error;

/// Reasons a decoded value tree cannot become torrent metadata.
///
/// `offset` is the start of the value where the problem was found; for a
/// missing field that is the enclosing dictionary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("torrent root at byte {offset} is not a dictionary")]
    NotADictionary { offset: usize },

    #[error("missing field '{field}' (dictionary at byte {offset})")]
    MissingField { field: String, offset: usize },

    #[error("invalid field '{field}' at byte {offset}: {reason}")]
    InvalidField {
        field: String,
        reason: String,
        offset: usize,
    },

    #[error("info dictionary at byte {offset} must have exactly one of 'length' or 'files'")]
    AmbiguousFileMode { offset: usize },

    #[error("malformed announce-list at byte {offset}: {reason}")]
    MalformedAnnounceList { reason: String, offset: usize },
}

impl BuildError {
    pub(crate) fn missing(field: impl Into<String>, offset: usize) -> Self {
        BuildError::MissingField {
            field: field.into(),
            offset,
        }
    }

    pub(crate) fn invalid(
        field: impl Into<String>,
        reason: impl Into<String>,
        offset: usize,
    ) -> Self {
        BuildError::InvalidField {
            field: field.into(),
            reason: reason.into(),
            offset,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            BuildError::NotADictionary { offset }
            | BuildError::MissingField { offset, .. }
            | BuildError::InvalidField { offset, .. }
            | BuildError::AmbiguousFileMode { offset }
            | BuildError::MalformedAnnounceList { offset, .. } => *offset,
        }
    }
}

/// Non-fatal findings while building metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// A text field was not valid UTF-8 and was decoded lossily
    InvalidUtf8 { field: String, offset: usize },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::InvalidUtf8 { field, offset } => write!(
                f,
                "field '{}' at byte {} is not valid UTF-8; invalid sequences were replaced",
                field, offset
            ),
        }
    }
}
