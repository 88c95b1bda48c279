use super::hasher::{self, InfoHash};
use super::{BuildError, BuildWarning, Pieces};
use crate::bencode::{Dictionary, Node};

/// Represents a file in the torrent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: Vec<String>,
    pub length: u64,
}

/// Metadata extracted from a .torrent file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentMetadata {
    /// URL of the primary tracker
    pub announce: Option<String>,
    /// Tracker tiers, in order
    pub announce_list: Vec<Vec<String>>,
    pub created_by: Option<String>,
    pub comment: Option<String>,
    /// Seconds since the Unix epoch, as stored in the file
    pub creation_date: Option<i64>,
    /// SHA1 hash of the original bencoded info dictionary
    pub info_hash: InfoHash,
    /// Suggested name for the file or directory
    pub name: String,
    /// Number of bytes in each piece
    pub piece_length: u64,
    /// SHA1 hashes of all pieces
    pub pieces: Pieces,
    /// Files in the torrent; single-file torrents hold one entry
    pub files: Vec<FileInfo>,
    pub private: bool,
}

impl TorrentMetadata {
    /// Total length of all files
    pub fn total_length(&self) -> u64 {
        self.files.iter().map(|f| f.length).sum()
    }

    /// Get the info hash as a hex string
    pub fn info_hash_hex(&self) -> String {
        self.info_hash.hex()
    }

    /// Every tracker URL, primary first, then each tier in order, without repeats
    pub fn trackers(&self) -> Vec<&str> {
        let all = self
            .announce
            .iter()
            .chain(self.announce_list.iter().flatten())
            .map(String::as_str);

        let mut trackers: Vec<&str> = Vec::new();
        for url in all {
            if !trackers.contains(&url) {
                trackers.push(url);
            }
        }
        trackers
    }
}

/// Metadata plus the warnings raised while building it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built {
    pub metadata: TorrentMetadata,
    pub warnings: Vec<BuildWarning>,
}

/// Maps a decoded value tree onto [`TorrentMetadata`].
///
/// `raw_data` must be the buffer the tree was decoded from; the info hash is
/// taken over the span the `info` value occupied in it.
pub struct TorrentBuilder<'a> {
    raw_data: &'a [u8],
    warnings: Vec<BuildWarning>,
}

impl<'a> TorrentBuilder<'a> {
    pub fn new(raw_data: &'a [u8]) -> Self {
        Self {
            raw_data,
            warnings: Vec::new(),
        }
    }

    pub fn build(mut self, root: &Node) -> Result<Built, BuildError> {
        let dict = root.as_dict().ok_or(BuildError::NotADictionary {
            offset: root.span.start,
        })?;

        let info_node = dict
            .get(b"info".as_ref())
            .ok_or_else(|| BuildError::missing("info", root.span.start))?;
        let info = info_node.as_dict().ok_or_else(|| {
            BuildError::invalid(
                "info",
                format!("expected dictionary, found {}", info_node.kind()),
                info_node.span.start,
            )
        })?;
        let info_offset = info_node.span.start;

        // Parse piece length
        let piece_length_node = info
            .get(b"piece length".as_ref())
            .ok_or_else(|| BuildError::missing("info.piece length", info_offset))?;
        let piece_length = integer(piece_length_node, "info.piece length")?;
        if piece_length <= 0 {
            return Err(BuildError::invalid(
                "info.piece length",
                format!("must be positive, found {}", piece_length),
                piece_length_node.span.start,
            ));
        }

        // Parse pieces
        let pieces_node = info
            .get(b"pieces".as_ref())
            .ok_or_else(|| BuildError::missing("info.pieces", info_offset))?;
        let pieces_bytes = pieces_node.as_bytes().ok_or_else(|| {
            BuildError::invalid(
                "info.pieces",
                format!("expected byte string, found {}", pieces_node.kind()),
                pieces_node.span.start,
            )
        })?;
        let pieces = Pieces::from_bytes(pieces_bytes).ok_or_else(|| {
            BuildError::missing(
                "info.pieces length not multiple of 20",
                pieces_node.span.start,
            )
        })?;

        let name = self.optional_text(info, "name", "info.name")?;

        // Parse files (single-file or multi-file mode)
        let files = match (info.get(b"length".as_ref()), info.get(b"files".as_ref())) {
            (Some(length_node), None) => {
                let name = name
                    .clone()
                    .ok_or_else(|| BuildError::missing("info.name", info_offset))?;
                let length = file_length(length_node, "info.length")?;
                vec![FileInfo {
                    path: vec![name],
                    length,
                }]
            }
            (None, Some(files_node)) => self.file_list(files_node)?,
            _ => {
                return Err(BuildError::AmbiguousFileMode {
                    offset: info_offset,
                })
            }
        };

        let private = match info.get(b"private".as_ref()) {
            Some(node) => integer(node, "info.private")? == 1,
            None => false,
        };

        let announce = self
            .optional_text(dict, "announce", "announce")?
            .filter(|url| !url.is_empty());

        let announce_list = match dict.get(b"announce-list".as_ref()) {
            Some(node) => self.announce_list(node)?,
            None => Vec::new(),
        };

        let comment = self.optional_text(dict, "comment", "comment")?;
        let created_by = self.optional_text(dict, "created by", "created by")?;
        let creation_date = dict
            .get(b"creation date".as_ref())
            .map(|node| integer(node, "creation date"))
            .transpose()?;

        let info_hash = hasher::hash(self.raw_data, info_node.span);

        let metadata = TorrentMetadata {
            announce,
            announce_list,
            created_by,
            comment,
            creation_date,
            info_hash,
            name: name.unwrap_or_default(),
            piece_length: piece_length as u64,
            pieces,
            files,
            private,
        };

        Ok(Built {
            metadata,
            warnings: self.warnings,
        })
    }

    fn file_list(&mut self, files_node: &Node) -> Result<Vec<FileInfo>, BuildError> {
        let entries = files_node.as_list().ok_or_else(|| {
            BuildError::invalid(
                "info.files",
                format!("expected list, found {}", files_node.kind()),
                files_node.span.start,
            )
        })?;

        if entries.is_empty() {
            return Err(BuildError::invalid(
                "info.files",
                "file list is empty",
                files_node.span.start,
            ));
        }

        let mut files = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let field = format!("info.files[{}]", i);
            let file_dict = entry.as_dict().ok_or_else(|| {
                BuildError::invalid(
                    field.as_str(),
                    format!("expected dictionary, found {}", entry.kind()),
                    entry.span.start,
                )
            })?;

            let length_field = format!("{}.length", field);
            let length_node = file_dict
                .get(b"length".as_ref())
                .ok_or_else(|| BuildError::missing(length_field.as_str(), entry.span.start))?;
            let length = file_length(length_node, &length_field)?;

            let path_field = format!("{}.path", field);
            let path_node = file_dict
                .get(b"path".as_ref())
                .ok_or_else(|| BuildError::missing(path_field.as_str(), entry.span.start))?;
            let components = path_node.as_list().ok_or_else(|| {
                BuildError::invalid(
                    path_field.as_str(),
                    format!("expected list, found {}", path_node.kind()),
                    path_node.span.start,
                )
            })?;
            if components.is_empty() {
                return Err(BuildError::invalid(
                    path_field,
                    "path has no components",
                    path_node.span.start,
                ));
            }

            let path = components
                .iter()
                .map(|component| self.text(component, &path_field))
                .collect::<Result<Vec<_>, _>>()?;

            files.push(FileInfo { path, length });
        }

        Ok(files)
    }

    fn announce_list(&mut self, node: &Node) -> Result<Vec<Vec<String>>, BuildError> {
        let tiers = node
            .as_list()
            .ok_or_else(|| BuildError::MalformedAnnounceList {
                reason: format!("expected list of tiers, found {}", node.kind()),
                offset: node.span.start,
            })?;

        let mut announce_list = Vec::with_capacity(tiers.len());
        for (i, tier) in tiers.iter().enumerate() {
            let urls = tier
                .as_list()
                .ok_or_else(|| BuildError::MalformedAnnounceList {
                    reason: format!("tier {} is a {}, not a list", i, tier.kind()),
                    offset: tier.span.start,
                })?;

            let mut tier_urls = Vec::with_capacity(urls.len());
            for url in urls {
                if url.as_bytes().is_none() {
                    return Err(BuildError::MalformedAnnounceList {
                        reason: format!("tier {} contains a {}", i, url.kind()),
                        offset: url.span.start,
                    });
                }

                let url = self.text(url, "announce-list")?;
                if !url.is_empty() {
                    tier_urls.push(url);
                }
            }

            if !tier_urls.is_empty() {
                announce_list.push(tier_urls);
            }
        }

        Ok(announce_list)
    }

    fn optional_text(
        &mut self,
        dict: &Dictionary,
        key: &str,
        field: &str,
    ) -> Result<Option<String>, BuildError> {
        dict.get(key.as_bytes())
            .map(|node| self.text(node, field))
            .transpose()
    }

    /// Decode a human-readable byte string, replacing invalid UTF-8
    fn text(&mut self, node: &Node, field: &str) -> Result<String, BuildError> {
        let bytes = node.as_bytes().ok_or_else(|| {
            BuildError::invalid(
                field,
                format!("expected byte string, found {}", node.kind()),
                node.span.start,
            )
        })?;

        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                self.warnings.push(BuildWarning::InvalidUtf8 {
                    field: field.to_string(),
                    offset: node.span.start,
                });
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn integer(node: &Node, field: &str) -> Result<i64, BuildError> {
    node.as_integer().ok_or_else(|| {
        BuildError::invalid(
            field,
            format!("expected integer, found {}", node.kind()),
            node.span.start,
        )
    })
}

fn file_length(node: &Node, field: &str) -> Result<u64, BuildError> {
    let length = integer(node, field)?;
    u64::try_from(length).map_err(|_| {
        BuildError::invalid(
            field,
            format!("must not be negative, found {}", length),
            node.span.start,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::encoder::{bytes, dict, encode, int, list};
    use crate::bencode::{decode, Value};
    use sha1::{Digest, Sha1};

    const TRACKER: &str = "http://tracker.example.org:6969/announce";

    fn single_file_info() -> Value {
        dict(vec![
            ("length", int(1024)),
            ("name", bytes("file.bin")),
            ("piece length", int(16384)),
            ("pieces", bytes([0xabu8; 40])),
        ])
    }

    fn torrent_with(info: Value) -> Vec<u8> {
        encode(&dict(vec![
            ("announce", bytes(TRACKER)),
            ("comment", bytes("test torrent")),
            ("created by", bytes("mktorrent 1.1")),
            ("creation date", int(1_519_934_077)),
            ("info", info),
        ]))
    }

    fn build_bytes(data: &[u8]) -> Result<Built, BuildError> {
        let decoded = decode(data).unwrap();
        TorrentBuilder::new(data).build(&decoded.root)
    }

    fn sha1_hex(data: &[u8]) -> String {
        hex::encode(Sha1::digest(data))
    }

    #[test]
    fn test_single_file_torrent() {
        let data = torrent_with(single_file_info());
        let built = build_bytes(&data).unwrap();
        let metadata = built.metadata;

        assert!(built.warnings.is_empty());
        assert_eq!(metadata.announce.as_deref(), Some(TRACKER));
        assert!(metadata.announce_list.is_empty());
        assert_eq!(metadata.comment.as_deref(), Some("test torrent"));
        assert_eq!(metadata.created_by.as_deref(), Some("mktorrent 1.1"));
        assert_eq!(metadata.creation_date, Some(1_519_934_077));
        assert_eq!(metadata.name, "file.bin");
        assert_eq!(metadata.piece_length, 16384);
        assert_eq!(metadata.pieces.len(), 2);
        assert_eq!(
            metadata.files,
            vec![FileInfo {
                path: vec!["file.bin".to_string()],
                length: 1024
            }]
        );
        assert_eq!(metadata.total_length(), 1024);
        assert!(!metadata.private);
    }

    #[test]
    fn test_info_hash_covers_original_info_bytes() {
        let info_bytes = encode(&single_file_info());
        let data = torrent_with(single_file_info());

        let metadata = build_bytes(&data).unwrap().metadata;
        assert_eq!(metadata.info_hash_hex(), sha1_hex(&info_bytes));
    }

    #[test]
    fn test_info_hash_is_not_recomputed_from_sorted_keys() {
        let unsorted = dict(vec![
            ("pieces", bytes([0x11u8; 20])),
            ("name", bytes("a.txt")),
            ("length", int(5)),
            ("piece length", int(32768)),
        ]);
        let sorted = dict(vec![
            ("length", int(5)),
            ("name", bytes("a.txt")),
            ("piece length", int(32768)),
            ("pieces", bytes([0x11u8; 20])),
        ]);
        let unsorted_bytes = encode(&unsorted);
        let data = torrent_with(unsorted);

        let metadata = build_bytes(&data).unwrap().metadata;
        assert_eq!(metadata.info_hash_hex(), sha1_hex(&unsorted_bytes));
        assert_ne!(metadata.info_hash_hex(), sha1_hex(&encode(&sorted)));
    }

    #[test]
    fn test_multi_file_torrent() {
        let info = dict(vec![
            (
                "files",
                list(vec![
                    dict(vec![
                        ("length", int(100)),
                        ("path", list(vec![bytes("docs"), bytes("readme.txt")])),
                    ]),
                    dict(vec![("length", int(0)), ("path", list(vec![bytes("empty")]))]),
                ]),
            ),
            ("name", bytes("bundle")),
            ("piece length", int(262144)),
            ("pieces", bytes([0u8; 20])),
            ("private", int(1)),
        ]);
        let metadata = build_bytes(&torrent_with(info)).unwrap().metadata;

        assert_eq!(metadata.name, "bundle");
        assert_eq!(metadata.files.len(), 2);
        assert_eq!(metadata.files[0].path, vec!["docs", "readme.txt"]);
        assert_eq!(metadata.files[1].length, 0);
        assert_eq!(metadata.total_length(), 100);
        assert!(metadata.private);
    }

    #[test]
    fn test_ambiguous_file_mode() {
        let both = dict(vec![
            ("files", list(vec![])),
            ("length", int(1)),
            ("name", bytes("x")),
            ("piece length", int(1)),
            ("pieces", bytes("")),
        ]);
        assert!(matches!(
            build_bytes(&torrent_with(both)),
            Err(BuildError::AmbiguousFileMode { .. })
        ));

        let neither = dict(vec![
            ("name", bytes("x")),
            ("piece length", int(1)),
            ("pieces", bytes("")),
        ]);
        assert!(matches!(
            build_bytes(&torrent_with(neither)),
            Err(BuildError::AmbiguousFileMode { .. })
        ));
    }

    #[test]
    fn test_missing_fields() {
        let missing = |data: &[u8]| match build_bytes(data) {
            Err(BuildError::MissingField { field, .. }) => field,
            other => panic!("expected MissingField, got {:?}", other),
        };

        assert_eq!(missing(&encode(&dict(vec![("announce", bytes(TRACKER))]))), "info");

        let no_piece_length = dict(vec![("length", int(1)), ("pieces", bytes(""))]);
        assert_eq!(missing(&torrent_with(no_piece_length)), "info.piece length");

        let no_pieces = dict(vec![("length", int(1)), ("piece length", int(1))]);
        assert_eq!(missing(&torrent_with(no_pieces)), "info.pieces");

        let short_pieces = dict(vec![
            ("length", int(1)),
            ("name", bytes("x")),
            ("piece length", int(1)),
            ("pieces", bytes([0u8; 21])),
        ]);
        assert_eq!(
            missing(&torrent_with(short_pieces)),
            "info.pieces length not multiple of 20"
        );

        let file_without_path = dict(vec![
            ("files", list(vec![dict(vec![("length", int(1))])])),
            ("piece length", int(1)),
            ("pieces", bytes("")),
        ]);
        assert_eq!(missing(&torrent_with(file_without_path)), "info.files[0].path");
    }

    #[test]
    fn test_root_must_be_dictionary() {
        assert_eq!(
            build_bytes(b"l4:spame").unwrap_err(),
            BuildError::NotADictionary { offset: 0 }
        );
    }

    #[test]
    fn test_invalid_field_values() {
        let zero_piece_length = dict(vec![
            ("length", int(1)),
            ("name", bytes("x")),
            ("piece length", int(0)),
            ("pieces", bytes("")),
        ]);
        assert!(matches!(
            build_bytes(&torrent_with(zero_piece_length)),
            Err(BuildError::InvalidField { ref field, .. }) if field == "info.piece length"
        ));

        let negative_length = dict(vec![
            ("length", int(-1)),
            ("name", bytes("x")),
            ("piece length", int(1)),
            ("pieces", bytes("")),
        ]);
        assert!(matches!(
            build_bytes(&torrent_with(negative_length)),
            Err(BuildError::InvalidField { ref field, .. }) if field == "info.length"
        ));

        assert!(matches!(
            build_bytes(&torrent_with(bytes("not a dict"))),
            Err(BuildError::InvalidField { ref field, .. }) if field == "info"
        ));
    }

    #[test]
    fn test_invalid_utf8_is_lossy_with_warning() {
        let data = encode(&dict(vec![
            ("comment", bytes(b"caf\xe9")),
            ("info", single_file_info()),
        ]));
        let built = build_bytes(&data).unwrap();

        assert_eq!(built.metadata.comment.as_deref(), Some("caf\u{FFFD}"));
        assert_eq!(built.metadata.announce, None);
        assert_eq!(
            built.warnings,
            vec![BuildWarning::InvalidUtf8 {
                field: "comment".to_string(),
                offset: 10,
            }]
        );
    }

    #[test]
    fn test_announce_list_tiers() {
        let data = encode(&dict(vec![
            ("announce", bytes(TRACKER)),
            (
                "announce-list",
                list(vec![
                    list(vec![bytes(TRACKER), bytes("")]),
                    list(vec![]),
                    list(vec![bytes("udp://backup.example.org:80"), bytes(TRACKER)]),
                ]),
            ),
            ("info", single_file_info()),
        ]));
        let metadata = build_bytes(&data).unwrap().metadata;

        assert_eq!(
            metadata.announce_list,
            vec![
                vec![TRACKER.to_string()],
                vec!["udp://backup.example.org:80".to_string(), TRACKER.to_string()],
            ]
        );
        assert_eq!(
            metadata.trackers(),
            vec![TRACKER, "udp://backup.example.org:80"]
        );
    }

    #[test]
    fn test_malformed_announce_list() {
        for announce_list in [
            bytes(TRACKER),
            list(vec![bytes(TRACKER)]),
            list(vec![list(vec![int(7)])]),
        ] {
            let data = encode(&dict(vec![
                ("announce-list", announce_list),
                ("info", single_file_info()),
            ]));
            assert!(matches!(
                build_bytes(&data),
                Err(BuildError::MalformedAnnounceList { .. })
            ));
        }
    }
}
