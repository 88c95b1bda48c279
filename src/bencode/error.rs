use std::fmt;
use thiserror::Error;

/// Structural problems found while decoding bencode.
///
/// Every variant carries the byte offset at which the problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("malformed integer at byte {offset}")]
    MalformedInteger { offset: usize },

    #[error("malformed byte string length at byte {offset}")]
    MalformedLength { offset: usize },

    #[error("container opened at byte {start} is not terminated (input ends at byte {offset})")]
    UnterminatedContainer { start: usize, offset: usize },

    #[error("dictionary key at byte {offset} is not a byte string")]
    NonStringKey { offset: usize },

    #[error("duplicate dictionary key {key:?} at byte {offset}")]
    DuplicateKey { key: String, offset: usize },

    #[error("dictionary key {key:?} at byte {offset} is out of order")]
    OutOfOrderKey { key: String, offset: usize },

    #[error("unknown tag {} at byte {offset}", describe_tag(.tag))]
    UnknownTag { tag: Option<u8>, offset: usize },

    #[error("nesting deeper than {max_depth} at byte {offset}")]
    MaxDepthExceeded { max_depth: usize, offset: usize },

    #[error("{remaining} trailing bytes after the root value at byte {offset}")]
    TrailingData { remaining: usize, offset: usize },
}

impl DecodeError {
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Truncated { offset }
            | DecodeError::MalformedInteger { offset }
            | DecodeError::MalformedLength { offset }
            | DecodeError::UnterminatedContainer { offset, .. }
            | DecodeError::NonStringKey { offset }
            | DecodeError::DuplicateKey { offset, .. }
            | DecodeError::OutOfOrderKey { offset, .. }
            | DecodeError::UnknownTag { offset, .. }
            | DecodeError::MaxDepthExceeded { offset, .. }
            | DecodeError::TrailingData { offset, .. } => *offset,
        }
    }
}

fn describe_tag(tag: &Option<u8>) -> String {
    match *tag {
        Some(byte) if byte.is_ascii_graphic() => format!("'{}'", byte as char),
        Some(byte) => format!("0x{:02x}", byte),
        None => "<end of input>".to_string(),
    }
}

/// Non-fatal findings from a lenient decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    OutOfOrderKey { key: String, offset: usize },
    TrailingData { remaining: usize, offset: usize },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::OutOfOrderKey { key, offset } => {
                write!(f, "dictionary key {:?} at byte {} is out of order", key, offset)
            }
            DecodeWarning::TrailingData { remaining, offset } => write!(
                f,
                "ignoring {} trailing bytes after the root value at byte {}",
                remaining, offset
            ),
        }
    }
}
