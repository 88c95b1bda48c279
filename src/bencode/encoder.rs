//! Test-only bencode encoder used to build fixtures.
//!
//! Dictionaries are written in their stored order, which lets tests produce
//! deliberately unsorted input.

use super::{Dictionary, Node, Span, Value};

/// Encode a Value into its byte representation
pub fn encode(value: &Value) -> Vec<u8> {
    let mut result = Vec::new();
    encode_into(value, &mut result);
    result
}

/// Encode a raw byte string with its length prefix
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::new();
    encode_bytes_into(bytes, &mut result);
    result
}

fn encode_bytes_into(bytes: &[u8], output: &mut Vec<u8>) {
    output.extend_from_slice(bytes.len().to_string().as_bytes());
    output.push(b':');
    output.extend_from_slice(bytes);
}

fn encode_into(value: &Value, output: &mut Vec<u8>) {
    match value {
        Value::Integer(i) => {
            output.push(b'i');
            output.extend_from_slice(i.to_string().as_bytes());
            output.push(b'e');
        }
        Value::ByteString(s) => encode_bytes_into(s, output),
        Value::List(list) => {
            output.push(b'l');
            for item in list {
                encode_into(&item.value, output);
            }
            output.push(b'e');
        }
        Value::Dictionary(dict) => {
            output.push(b'd');
            for (key, node) in dict.iter() {
                encode_bytes_into(key, output);
                encode_into(&node.value, output);
            }
            output.push(b'e');
        }
    }
}

// Fixture constructors. Spans are placeholders; only decoded trees carry real ones.

fn node(value: Value) -> Node {
    Node::new(value, Span::new(0, 0))
}

pub fn int(i: i64) -> Value {
    Value::Integer(i)
}

pub fn bytes(b: impl AsRef<[u8]>) -> Value {
    Value::ByteString(b.as_ref().to_vec())
}

pub fn list(items: Vec<Value>) -> Value {
    Value::List(items.into_iter().map(node).collect())
}

pub fn dict(entries: Vec<(&str, Value)>) -> Value {
    let mut map = Dictionary::new();
    for (key, value) in entries {
        map.insert(key.as_bytes().to_vec(), node(value));
    }
    Value::Dictionary(map)
}
