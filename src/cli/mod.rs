use crate::bencode::{DecodeConfig, TrailingData, DEFAULT_MAX_DEPTH};
use crate::error::{Result, TorrentJsonError};
use crate::json::{self, RenderOptions};
use crate::server::{self, ServeConfig};
use crate::storage;
use crate::torrent::{self, ParsedTorrent};
use bytes::Bytes;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "torrent-json")]
#[command(
    about = "Decode a .torrent file and render its metadata as JSON",
    long_about = "Decode a .torrent file and render its metadata as JSON.\n\n\
                  By default the document is served at http://127.0.0.1:8080/. \
                  Use -N to print it instead, and -o to also write it to disk. \
                  A bare -o directly before the torrent path writes into the \
                  current directory."
)]
pub struct Cli {
    /// Path to the .torrent file
    #[arg(required_unless_present = "output")]
    torrent: Option<PathBuf>,

    /// Write the JSON to this file, or into this directory as <torrent name>.json
    /// [default: ./]
    #[arg(short, long, value_name = "PATH", num_args = 0..=1)]
    output: Option<Option<PathBuf>>,

    /// Print the JSON to the console instead of serving it
    #[arg(short = 'N', long)]
    no_serve: bool,

    /// Address to serve the JSON on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Reject unsorted dictionary keys and trailing bytes
    #[arg(long)]
    strict: bool,

    /// Maximum nesting of lists and dictionaries
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Include every piece hash in the output
    #[arg(long)]
    pieces: bool,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,
}

const CURRENT_DIR: &str = "./";

impl Cli {
    pub fn parse() -> Self {
        Self::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse arguments, giving `-o <torrent>` the torrent path when no other
    /// positional argument follows
    pub fn try_parse_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cli = <Self as Parser>::try_parse_from(args)?;

        if cli.torrent.is_none() {
            match cli.output.take() {
                Some(Some(path)) => {
                    cli.torrent = Some(path);
                    cli.output = Some(None);
                }
                _ => {
                    return Err(Self::command().error(
                        ErrorKind::MissingRequiredArgument,
                        "the path to a .torrent file is required",
                    ))
                }
            }
        }

        Ok(cli)
    }

    fn torrent_path(&self) -> Result<&Path> {
        self.torrent.as_deref().ok_or(TorrentJsonError::MissingInput)
    }

    /// Where `-o` asked the document to go, if anywhere
    fn output_target(&self) -> Option<&Path> {
        self.output
            .as_ref()
            .map(|target| target.as_deref().unwrap_or(Path::new(CURRENT_DIR)))
    }

    fn decode_config(&self) -> DecodeConfig {
        DecodeConfig {
            max_depth: self.max_depth,
            strict_key_order: self.strict,
            trailing_data: if self.strict {
                TrailingData::Reject
            } else {
                TrailingData::Warn
            },
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            include_pieces: self.pieces,
            compact: self.compact,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let torrent_path = self.torrent_path()?;
        let parsed = torrent::load_torrent_file(torrent_path, &self.decode_config()).await?;
        report_warnings(&parsed);

        let metadata = &parsed.metadata;
        info!(
            "Parsed {}: {} file(s), {} bytes, info hash {}",
            torrent_path.display(),
            metadata.files.len(),
            metadata.total_length(),
            metadata.info_hash
        );

        let document = json::serialize(metadata, &self.render_options())?;

        if let Some(target) = self.output_target() {
            let written = storage::write_document(torrent_path, target, &document).await?;
            info!("Success: written to {}", written.display());
        }

        if self.no_serve {
            println!("{}", document);
            return Ok(());
        }

        let config = ServeConfig {
            bind_address: self.bind,
        };
        server::serve(&config, Bytes::from(document)).await
    }
}

fn report_warnings(parsed: &ParsedTorrent) {
    for warning in &parsed.decode_warnings {
        warn!("{}", warning);
    }
    for warning in &parsed.build_warnings {
        warn!("{}", warning);
    }
}
