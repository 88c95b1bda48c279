use crate::bencode::DecodeError;
use crate::torrent::BuildError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TorrentJsonError {
    #[error("Bencode decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid torrent file: {0}")]
    Build(#[from] BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No .torrent file given")]
    MissingInput,

    #[error("Rendered JSON is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid output location: {0}")]
    InvalidOutput(String),

    #[error("HTTP server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, TorrentJsonError>;
