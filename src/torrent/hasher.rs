use crate::bencode::Span;
use sha1::{Digest, Sha1};
use std::fmt;

/// SHA1 digest of the original bencoded info dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    pub fn new(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex form
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Hash the exact bytes the info value was decoded from, never a
/// re-encoding of the decoded tree.
///
/// # Panics
///
/// Panics if `span` lies outside `raw_data`. Spans produced by the decoder
/// for the same buffer are always in bounds.
pub fn hash(raw_data: &[u8], span: Span) -> InfoHash {
    let mut hasher = Sha1::new();
    hasher.update(&raw_data[span.range()]);
    let digest = hasher.finalize();

    let mut result = [0u8; 20];
    result.copy_from_slice(&digest);
    InfoHash(result)
}
