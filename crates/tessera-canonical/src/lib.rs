//! Canonical value contract for Tessera values.
//!
//! Every value reports the exact length of its canonical encoding without producing
//! it, and a bounded [`Fingerprint`] that compound values combine recursively. This
//! makes re-fingerprinting a Merkle-style tree after a local change proportional to
//! the touched path rather than the serialized size.
//!
#![deny(missing_docs)]

/// Lists, dictionaries and offloaded children.
pub mod compound;
/// Error types.
pub mod errors;
/// Fingerprint shape, serialization and digest rules.
pub mod fingerprint;
/// Decimal text parsing configuration.
pub mod format;
/// Arbitrary-precision integer values.
pub mod integer;
/// Value kind tags.
pub mod kind;
/// The `CanonicalValue` contract and the `Value` union.
pub mod value;

pub use compound::{Dictionary, Key, List, Loader, Node, Offloaded};
pub use errors::{ConversionError, FingerprintError, FormatError};
pub use fingerprint::{Fingerprint, DIGEST_CAPACITY, SERIALIZED_CAPACITY};
pub use format::NumberFormat;
pub use integer::Integer;
pub use kind::ValueKind;
pub use value::{CanonicalValue, Value};

/// Arbitrary-precision integer type wrapped by [`Integer`].
pub use num_bigint::BigInt;
