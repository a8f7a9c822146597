//! The value contract and the closed value union.

use std::fmt;
use std::fmt::Write as _;

use crate::compound::{Dictionary, List};
use crate::fingerprint::Fingerprint;
use crate::integer::Integer;
use crate::kind::ValueKind;

/// Capabilities every value kind provides.
///
/// All operations are pure and total: once a value exists none of them can fail.
pub trait CanonicalValue {
    /// Kind tag of the value.
    fn kind(&self) -> ValueKind;

    /// Exact length in bytes of the canonical encoding, computed without encoding.
    fn encoding_length(&self) -> u64;

    /// Bounded content digest; equal values have equal fingerprints.
    fn fingerprint(&self) -> Fingerprint;

    /// Human-readable canonical text. `load_all` forces offloaded children to load.
    fn inspect(&self, load_all: bool) -> String;
}

/// Any value of the closed kind set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Null.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Arbitrary-precision integer.
    Integer(Integer),
    /// Byte string.
    Binary(Vec<u8>),
    /// Unicode text.
    Text(String),
    /// Ordered list.
    List(List),
    /// Key-ordered dictionary.
    Dictionary(Dictionary),
}

impl Value {
    /// Wraps a byte string.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Binary(bytes.into())
    }

    /// Wraps a text string.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }
}

impl CanonicalValue for Value {
    fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Binary(_) => ValueKind::Binary,
            Value::Text(_) => ValueKind::Text,
            Value::List(_) => ValueKind::List,
            Value::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    fn encoding_length(&self) -> u64 {
        match self {
            Value::Null | Value::Boolean(_) => 1,
            Value::Integer(integer) => integer.encoding_length(),
            Value::Binary(bytes) => binary_encoding_length(bytes),
            Value::Text(text) => text_encoding_length(text),
            Value::List(list) => list.encoding_length(),
            Value::Dictionary(dictionary) => dictionary.encoding_length(),
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        match self {
            Value::Null => Fingerprint::raw_or_hashed(ValueKind::Null, 1, &[]),
            Value::Boolean(flag) => {
                Fingerprint::raw_or_hashed(ValueKind::Boolean, 1, &[u8::from(*flag)])
            }
            Value::Integer(integer) => integer.fingerprint(),
            Value::Binary(bytes) => binary_fingerprint(bytes),
            Value::Text(text) => text_fingerprint(text),
            Value::List(list) => list.fingerprint(),
            Value::Dictionary(dictionary) => dictionary.fingerprint(),
        }
    }

    fn inspect(&self, load_all: bool) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Boolean(flag) => flag.to_string(),
            Value::Integer(integer) => integer.inspect(load_all),
            Value::Binary(bytes) => inspect_binary(bytes),
            Value::Text(text) => inspect_text(text),
            Value::List(list) => list.inspect(load_all),
            Value::Dictionary(dictionary) => dictionary.inspect(load_all),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect(false))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

macro_rules! integer_values {
    ($($native:ty),* $(,)?) => {
        $(
            impl From<$native> for Value {
                fn from(value: $native) -> Self {
                    Value::Integer(Integer::from(value))
                }
            }
        )*
    };
}

integer_values!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Binary(value.to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}

impl From<Dictionary> for Value {
    fn from(value: Dictionary) -> Self {
        Value::Dictionary(value)
    }
}

/// Decimal digits needed to write `n`.
pub(crate) fn decimal_digits(n: u64) -> u64 {
    n.checked_ilog10().map_or(1, |d| u64::from(d) + 1)
}

/// `<len>:<bytes>`
pub(crate) fn binary_encoding_length(bytes: &[u8]) -> u64 {
    let len = bytes.len() as u64;
    decimal_digits(len) + 1 + len
}

/// `u<len>:<utf8>`
pub(crate) fn text_encoding_length(text: &str) -> u64 {
    let len = text.len() as u64;
    1 + decimal_digits(len) + 1 + len
}

pub(crate) fn binary_fingerprint(bytes: &[u8]) -> Fingerprint {
    Fingerprint::raw_or_hashed(ValueKind::Binary, binary_encoding_length(bytes), bytes)
}

pub(crate) fn text_fingerprint(text: &str) -> Fingerprint {
    Fingerprint::raw_or_hashed(ValueKind::Text, text_encoding_length(text), text.as_bytes())
}

pub(crate) fn inspect_binary(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(3 + bytes.len() * 4);
    out.push_str("b\"");
    for byte in bytes {
        let _ = write!(out, "\\x{:02x}", byte);
    }
    out.push('"');
    out
}

pub(crate) fn inspect_text(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{:?}", text))
}
