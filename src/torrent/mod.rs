mod error;
mod hasher;
mod metainfo;
mod piece;

pub use error::{BuildError, BuildWarning};
pub use hasher::{hash as hash_info, InfoHash};
pub use metainfo::{Built, FileInfo, TorrentBuilder, TorrentMetadata};
pub use piece::{PieceHash, Pieces, PIECE_HASH_LEN};

use crate::bencode::{decode_with, DecodeConfig, DecodeWarning};
use crate::error::Result;
use std::path::Path;
use tokio::fs;

/// Metadata together with every non-fatal warning raised on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTorrent {
    pub metadata: TorrentMetadata,
    pub decode_warnings: Vec<DecodeWarning>,
    pub build_warnings: Vec<BuildWarning>,
}

/// Load and parse a .torrent file
pub async fn load_torrent_file<P: AsRef<Path>>(
    path: P,
    config: &DecodeConfig,
) -> Result<ParsedTorrent> {
    let data = fs::read(path).await?;
    parse_torrent(&data, config)
}

/// Parse torrent data from bytes
pub fn parse_torrent(data: &[u8], config: &DecodeConfig) -> Result<ParsedTorrent> {
    let decoded = decode_with(data, config)?;
    let built = TorrentBuilder::new(data).build(&decoded.root)?;

    Ok(ParsedTorrent {
        metadata: built.metadata,
        decode_warnings: decoded.warnings,
        build_warnings: built.warnings,
    })
}
