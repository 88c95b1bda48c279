/// Size of one SHA1 piece hash
pub const PIECE_HASH_LEN: usize = 20;

/// A 20-byte SHA1 hash representing a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceHash([u8; PIECE_HASH_LEN]);

impl PieceHash {
    pub fn new(hash: [u8; PIECE_HASH_LEN]) -> Self {
        Self(hash)
    }

    pub fn as_bytes(&self) -> &[u8; PIECE_HASH_LEN] {
        &self.0
    }

    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for PieceHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Collection of piece hashes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pieces {
    hashes: Vec<PieceHash>,
}

impl Pieces {
    /// Split concatenated SHA1 hashes into pieces.
    ///
    /// Returns `None` when the length is not a multiple of [`PIECE_HASH_LEN`].
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() % PIECE_HASH_LEN != 0 {
            return None;
        }

        let hashes = data
            .chunks_exact(PIECE_HASH_LEN)
            .map(|chunk| {
                let mut hash = [0u8; PIECE_HASH_LEN];
                hash.copy_from_slice(chunk);
                PieceHash(hash)
            })
            .collect();

        Some(Self { hashes })
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PieceHash> {
        self.hashes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceHash> {
        self.hashes.iter()
    }
}
