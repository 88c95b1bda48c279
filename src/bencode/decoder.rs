use super::{ByteCursor, DecodeError, DecodeWarning, Dictionary, Node, Span, Value};

/// Default ceiling on nested lists and dictionaries
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// What to do with bytes left over after the root value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingData {
    /// Record a warning and ignore them
    #[default]
    Warn,
    /// Fail with [`DecodeError::TrailingData`]
    Reject,
}

/// Configuration for the bencode decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    pub max_depth: usize,
    /// Reject dictionaries whose keys are not in ascending byte order
    pub strict_key_order: bool,
    pub trailing_data: TrailingData,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_key_order: false,
            trailing_data: TrailingData::Warn,
        }
    }
}

impl DecodeConfig {
    /// Strict key ordering and no trailing bytes
    pub fn strict() -> Self {
        Self {
            strict_key_order: true,
            trailing_data: TrailingData::Reject,
            ..Self::default()
        }
    }
}

/// Result of decoding a complete buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub root: Node,
    pub warnings: Vec<DecodeWarning>,
}

/// Decode a complete bencoded buffer with the default configuration
pub fn decode(data: &[u8]) -> Result<Decoded, DecodeError> {
    decode_with(data, &DecodeConfig::default())
}

/// Decode a complete bencoded buffer, applying the trailing-data policy
/// once the root value has been read
pub fn decode_with(data: &[u8], config: &DecodeConfig) -> Result<Decoded, DecodeError> {
    let mut cursor = ByteCursor::new(data);
    let mut decoder = ValueDecoder::new(config);
    let root = decoder.decode(&mut cursor)?;

    if !cursor.is_exhausted() {
        let remaining = cursor.remaining();
        let offset = cursor.position();
        match config.trailing_data {
            TrailingData::Reject => {
                return Err(DecodeError::TrailingData { remaining, offset });
            }
            TrailingData::Warn => decoder
                .warnings
                .push(DecodeWarning::TrailingData { remaining, offset }),
        }
    }

    Ok(Decoded {
        root,
        warnings: decoder.warnings,
    })
}

/// Recursive-descent decoder producing [`Node`]s with exact byte spans
pub struct ValueDecoder<'c> {
    config: &'c DecodeConfig,
    warnings: Vec<DecodeWarning>,
}

impl<'c> ValueDecoder<'c> {
    pub fn new(config: &'c DecodeConfig) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }

    /// Decode one value starting at the cursor. The bytes consumed are
    /// `node.span.len()`.
    pub fn decode(&mut self, cursor: &mut ByteCursor<'_>) -> Result<Node, DecodeError> {
        self.decode_value(cursor, 0)
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    fn decode_value(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        depth: usize,
    ) -> Result<Node, DecodeError> {
        let start = cursor.position();

        let value = match cursor.peek_byte() {
            Some(b'i') => Value::Integer(decode_integer(cursor)?),
            Some(b'0'..=b'9') => Value::ByteString(decode_bytes(cursor)?.to_vec()),
            Some(b'l') => self.decode_list(cursor, depth)?,
            Some(b'd') => self.decode_dict(cursor, depth)?,
            tag => return Err(DecodeError::UnknownTag { tag, offset: start }),
        };

        Ok(Node::new(value, Span::new(start, cursor.position())))
    }

    fn check_depth(&self, depth: usize, offset: usize) -> Result<(), DecodeError> {
        if depth >= self.config.max_depth {
            return Err(DecodeError::MaxDepthExceeded {
                max_depth: self.config.max_depth,
                offset,
            });
        }
        Ok(())
    }

    fn decode_list(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let start = cursor.position();
        self.check_depth(depth, start)?;
        cursor.read_byte()?; // Skip 'l'

        let mut list = Vec::new();
        loop {
            match cursor.peek_byte() {
                None => {
                    return Err(DecodeError::UnterminatedContainer {
                        start,
                        offset: cursor.position(),
                    })
                }
                Some(b'e') => {
                    cursor.read_byte()?;
                    break;
                }
                Some(_) => list.push(self.decode_value(cursor, depth + 1)?),
            }
        }

        Ok(Value::List(list))
    }

    fn decode_dict(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let start = cursor.position();
        self.check_depth(depth, start)?;
        cursor.read_byte()?; // Skip 'd'

        let mut dict = Dictionary::new();
        let mut previous_key: Option<Vec<u8>> = None;

        loop {
            let key_offset = cursor.position();
            match cursor.peek_byte() {
                None => {
                    return Err(DecodeError::UnterminatedContainer {
                        start,
                        offset: key_offset,
                    })
                }
                Some(b'e') => {
                    cursor.read_byte()?;
                    break;
                }
                Some(b'0'..=b'9') => {}
                Some(_) => return Err(DecodeError::NonStringKey { offset: key_offset }),
            }

            let key = decode_bytes(cursor)?.to_vec();

            if dict.contains_key(&key) {
                return Err(DecodeError::DuplicateKey {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    offset: key_offset,
                });
            }

            if previous_key.as_ref().is_some_and(|prev| *prev > key) {
                let key = String::from_utf8_lossy(&key).into_owned();
                if self.config.strict_key_order {
                    return Err(DecodeError::OutOfOrderKey {
                        key,
                        offset: key_offset,
                    });
                }
                self.warnings.push(DecodeWarning::OutOfOrderKey {
                    key,
                    offset: key_offset,
                });
            }

            // A key must be followed by its value
            if cursor.is_exhausted() {
                return Err(DecodeError::UnterminatedContainer {
                    start,
                    offset: cursor.position(),
                });
            }

            let value = self.decode_value(cursor, depth + 1)?;
            previous_key = Some(key.clone());
            dict.insert(key, value);
        }

        Ok(Value::Dictionary(dict))
    }
}

/// Parse `i<digits>e`, rejecting leading zeros, `-0` and overflow
fn decode_integer(cursor: &mut ByteCursor<'_>) -> Result<i64, DecodeError> {
    let start = cursor.position();
    cursor.read_byte()?; // Skip 'i'

    let negative = cursor.peek_byte() == Some(b'-');
    if negative {
        cursor.read_byte()?;
    }

    let mut value: i64 = 0;
    let mut digits = 0usize;
    let mut leading_zero = false;

    loop {
        let offset = cursor.position();
        match cursor.read_byte()? {
            b'e' => break,
            byte @ b'0'..=b'9' => {
                if leading_zero {
                    return Err(DecodeError::MalformedInteger { offset });
                }
                if byte == b'0' && digits == 0 {
                    leading_zero = true;
                }

                let digit = i64::from(byte - b'0');
                value = value
                    .checked_mul(10)
                    .and_then(|v| {
                        if negative {
                            v.checked_sub(digit)
                        } else {
                            v.checked_add(digit)
                        }
                    })
                    .ok_or(DecodeError::MalformedInteger { offset: start })?;
                digits += 1;
            }
            _ => return Err(DecodeError::MalformedInteger { offset }),
        }
    }

    if digits == 0 || (negative && leading_zero) {
        return Err(DecodeError::MalformedInteger { offset: start });
    }

    Ok(value)
}

/// Parse `<length>:<bytes>` and return the raw bytes
fn decode_bytes<'a>(cursor: &mut ByteCursor<'a>) -> Result<&'a [u8], DecodeError> {
    let start = cursor.position();

    let mut len: usize = 0;
    let mut digits = 0usize;
    let mut leading_zero = false;

    loop {
        let offset = cursor.position();
        match cursor.read_byte()? {
            b':' => break,
            byte @ b'0'..=b'9' => {
                if leading_zero {
                    return Err(DecodeError::MalformedLength { offset });
                }
                if byte == b'0' && digits == 0 {
                    leading_zero = true;
                }

                len = len
                    .checked_mul(10)
                    .and_then(|l| l.checked_add(usize::from(byte - b'0')))
                    .ok_or(DecodeError::MalformedLength { offset: start })?;
                digits += 1;
            }
            _ => return Err(DecodeError::MalformedLength { offset }),
        }
    }

    if digits == 0 {
        return Err(DecodeError::MalformedLength { offset: start });
    }

    cursor.read_exact(len)
}
