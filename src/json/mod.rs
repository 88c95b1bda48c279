//! JSON rendering of torrent metadata.
//!
//! Field order is fixed by the document structs, so rendering the same
//! metadata always yields identical text. All non-ASCII characters are
//! escaped as `\uXXXX` while the document is written.

use crate::error::Result;
use crate::torrent::TorrentMetadata;
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use std::io::{self, Write};

/// Rendering switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit every piece hash under `Pieces`
    pub include_pieces: bool,
    /// Single-line output instead of tab-indented
    pub compact: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Document<'a> {
    created_by: Option<&'a str>,
    created_at: Option<String>,
    info_hash: String,
    comment: Option<&'a str>,
    files: Vec<FileEntry<'a>>,
    announce: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pieces: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FileEntry<'a> {
    path: &'a [String],
    length: u64,
}

impl<'a> Document<'a> {
    fn new(metadata: &'a TorrentMetadata, options: &RenderOptions) -> Self {
        Self {
            created_by: metadata.created_by.as_deref(),
            created_at: metadata.creation_date.and_then(format_timestamp),
            info_hash: metadata.info_hash.hex(),
            comment: metadata.comment.as_deref(),
            files: metadata
                .files
                .iter()
                .map(|file| FileEntry {
                    path: &file.path,
                    length: file.length,
                })
                .collect(),
            announce: metadata.trackers(),
            pieces: options
                .include_pieces
                .then(|| metadata.pieces.iter().map(|p| p.hex()).collect()),
        }
    }
}

/// ISO-8601 in UTC with second precision; `None` if out of range
fn format_timestamp(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Render metadata as a JSON document
pub fn serialize(metadata: &TorrentMetadata, options: &RenderOptions) -> Result<String> {
    let document = Document::new(metadata, options);

    let mut buf = Vec::new();
    if options.compact {
        let formatter = AsciiFormatter::new(CompactFormatter);
        document.serialize(&mut Serializer::with_formatter(&mut buf, formatter))?;
    } else {
        let formatter = AsciiFormatter::new(PrettyFormatter::with_indent(b"\t"));
        document.serialize(&mut Serializer::with_formatter(&mut buf, formatter))?;
    }

    Ok(String::from_utf8(buf)?)
}

/// Wraps a formatter so every non-ASCII character inside a string is
/// written as one or two `\uXXXX` UTF-16 escapes.
struct AsciiFormatter<F> {
    inner: F,
}

impl<F> AsciiFormatter<F> {
    fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: Formatter> Formatter for AsciiFormatter<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        let mut run_start = 0;

        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[run_start..i].as_bytes())?;
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            run_start = i + c.len_utf8();
        }

        writer.write_all(fragment[run_start..].as_bytes())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}
