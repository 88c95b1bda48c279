use linked_hash_map::LinkedHashMap;
use std::ops::Range;

/// Dictionary entries in the order they were decoded
pub type Dictionary = LinkedHashMap<Vec<u8>, Node>;

/// Half-open byte range `[start, end)` a value occupied in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Represents a bencoded value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Integer: i<number>e
    Integer(i64),
    /// Byte string: <length>:<contents>
    ByteString(Vec<u8>),
    /// List: l<values>e
    List(Vec<Node>),
    /// Dictionary: d<key-value pairs>e
    Dictionary(Dictionary),
}

/// A decoded value paired with the exact bytes it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub value: Value,
    pub span: Span,
}

impl Node {
    pub fn new(value: Value, span: Span) -> Self {
        Self { value, span }
    }

    /// Try to get this value as an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Try to get this value as a byte string
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            Value::ByteString(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a UTF-8 string
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Try to get this value as a list
    pub fn as_list(&self) -> Option<&[Node]> {
        match &self.value {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Try to get this value as a dictionary
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match &self.value {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Get a value from a dictionary by key
    pub fn dict_get(&self, key: &[u8]) -> Option<&Node> {
        self.as_dict()?.get(key)
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self.value {
            Value::Integer(_) => "integer",
            Value::ByteString(_) => "byte string",
            Value::List(_) => "list",
            Value::Dictionary(_) => "dictionary",
        }
    }
}
