mod cursor;
mod decoder;
#[cfg(test)]
pub mod encoder;
mod error;
mod value;

pub use cursor::ByteCursor;
pub use decoder::{
    decode, decode_with, DecodeConfig, Decoded, TrailingData, ValueDecoder, DEFAULT_MAX_DEPTH,
};
pub use error::{DecodeError, DecodeWarning};
pub use value::{Dictionary, Node, Span, Value};
