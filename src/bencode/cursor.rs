use super::DecodeError;

/// Read position over an immutable input buffer.
///
/// Every read is bounds-checked before it completes, so running off the end
/// of the buffer surfaces as [`DecodeError::Truncated`] rather than a panic.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Look at the next byte without consuming it. `None` means end of input.
    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consume and return the next byte
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = self
            .peek_byte()
            .ok_or(DecodeError::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Consume exactly `n` bytes, or fail without moving if fewer remain
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated { offset: self.pos });
        }

        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
