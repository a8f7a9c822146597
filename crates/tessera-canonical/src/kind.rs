use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FingerprintError;

/// Closed set of value kinds.
///
/// The discriminant is the one-byte tag written in serialized fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ValueKind {
    /// `n`
    Null = 0,
    /// `t` / `f`
    Boolean = 1,
    /// Arbitrary-precision integer.
    Integer = 2,
    /// Byte string.
    Binary = 3,
    /// Unicode text.
    Text = 4,
    /// Ordered list of values.
    List = 5,
    /// Key-ordered dictionary.
    Dictionary = 6,
}

impl ValueKind {
    /// Every kind in tag order.
    pub const ALL: [ValueKind; 7] = [
        ValueKind::Null,
        ValueKind::Boolean,
        ValueKind::Integer,
        ValueKind::Binary,
        ValueKind::Text,
        ValueKind::List,
        ValueKind::Dictionary,
    ];

    /// One-byte tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Lowercase kind name, as used in JSON and display output.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Binary => "binary",
            ValueKind::Text => "text",
            ValueKind::List => "list",
            ValueKind::Dictionary => "dictionary",
        }
    }
}

impl TryFrom<u8> for ValueKind {
    type Error = FingerprintError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        ValueKind::ALL
            .get(tag as usize)
            .copied()
            .ok_or(FingerprintError::UnknownKind(tag))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
