//! Decode `.torrent` files and render their metadata as JSON.
//!
//! Decoding, metadata building and rendering (`bencode`,
//! [`torrent::parse_torrent`], `json`) work on in-memory buffers and never log.
//! `cli`, `storage` and `server` drive them and handle files and sockets.

pub mod bencode;
pub mod cli;
pub mod error;
pub mod json;
pub mod server;
pub mod storage;
pub mod torrent;

pub use error::{Result, TorrentJsonError};
