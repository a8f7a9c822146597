use thiserror::Error;

/// Decimal text that does not describe an optionally-signed integer literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The text was empty (or only whitespace).
    #[error("empty integer literal")]
    Empty,
    /// A character outside the allowed sign/digit/whitespace set was found.
    #[error("'{value}' is not an integer literal: unexpected {found:?} at byte {index}")]
    InvalidCharacter {
        /// Offending text.
        value: String,
        /// Byte offset of the offending character.
        index: usize,
        /// The offending character.
        found: char,
    },
    /// A sign was present without any digits after it.
    #[error("'{value}' has no digits")]
    MissingDigits {
        /// Offending text.
        value: String,
    },
}

/// Checked narrowing of an integer into a fixed-width type failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value does not fit the target type.
    #[error("{value} is out of range for {target}")]
    OutOfRange {
        /// Name of the target type.
        target: &'static str,
        /// Canonical decimal text of the value.
        value: String,
    },
}

/// Serialized fingerprint bytes could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    /// Input ended before the declared shape was complete.
    #[error("fingerprint truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },
    /// The kind tag is not a known value kind.
    #[error("unknown value kind tag 0x{0:02x}")]
    UnknownKind(u8),
    /// The declared digest length exceeds the fixed capacity.
    #[error("digest length {0} exceeds 20 bytes")]
    DigestTooLong(usize),
    /// Bytes remained after a complete fingerprint.
    #[error("{0} trailing bytes after fingerprint")]
    TrailingBytes(usize),
    /// The JSON digest field is not valid base64url.
    #[error("invalid digest encoding: {0}")]
    InvalidDigestEncoding(String),
}
