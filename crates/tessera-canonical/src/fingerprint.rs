//! Fixed-shape content fingerprints.
//!
//! Serialized shape: `kind (1) || encoding_length (u64 LE, 8) || digest_len (1) || digest`.

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

use crate::errors::FingerprintError;
use crate::kind::ValueKind;

/// Maximum digest length in bytes.
pub const DIGEST_CAPACITY: usize = 20;

/// Largest serialized fingerprint: kind + length + digest length + digest.
pub const SERIALIZED_CAPACITY: usize = 1 + 8 + 1 + DIGEST_CAPACITY;

const HEADER_LEN: usize = 1 + 8 + 1;

/// Content digest of a value: kind, canonical encoding length and up to 20 digest bytes.
///
/// Bytes past `digest_len` are always zero, so derived equality and hashing only
/// observe the meaningful prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "FingerprintJson", try_from = "FingerprintJson")]
pub struct Fingerprint {
    kind: ValueKind,
    encoding_length: u64,
    digest: [u8; DIGEST_CAPACITY],
    digest_len: u8,
}

impl Fingerprint {
    /// Builds a fingerprint from an explicit digest of at most 20 bytes.
    pub fn new(
        kind: ValueKind,
        encoding_length: u64,
        digest: &[u8],
    ) -> Result<Self, FingerprintError> {
        if digest.len() > DIGEST_CAPACITY {
            return Err(FingerprintError::DigestTooLong(digest.len()));
        }
        Ok(Self::from_fitting(kind, encoding_length, digest))
    }

    /// Uses `content` as the digest when it fits, otherwise its 20-byte hash.
    pub fn raw_or_hashed(kind: ValueKind, encoding_length: u64, content: &[u8]) -> Self {
        if content.len() <= DIGEST_CAPACITY {
            return Self::from_fitting(kind, encoding_length, content);
        }
        tracing::trace!(%kind, len = content.len(), "hashing oversized digest content");
        let mut hasher = DigestHasher::new();
        hasher.update(content);
        hasher.finish(kind, encoding_length)
    }

    /// `digest` must be at most `DIGEST_CAPACITY` bytes.
    fn from_fitting(kind: ValueKind, encoding_length: u64, digest: &[u8]) -> Self {
        let mut buffer = [0u8; DIGEST_CAPACITY];
        buffer[..digest.len()].copy_from_slice(digest);
        Self {
            kind,
            encoding_length,
            digest: buffer,
            digest_len: digest.len() as u8,
        }
    }

    /// Value kind the fingerprint was taken from.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Canonical encoding length of the fingerprinted value.
    pub fn encoding_length(&self) -> u64 {
        self.encoding_length
    }

    /// Meaningful digest bytes (0 to 20).
    pub fn digest(&self) -> &[u8] {
        &self.digest[..self.digest_len as usize]
    }

    /// Writes the serialized shape into a fixed buffer, returning the used length.
    pub fn serialize(&self, out: &mut [u8; SERIALIZED_CAPACITY]) -> usize {
        let digest = self.digest();
        out[0] = self.kind.tag();
        out[1..9].copy_from_slice(&self.encoding_length.to_le_bytes());
        out[9] = self.digest_len;
        out[HEADER_LEN..HEADER_LEN + digest.len()].copy_from_slice(digest);
        HEADER_LEN + digest.len()
    }

    /// Serialized shape as an owned byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = [0u8; SERIALIZED_CAPACITY];
        let len = self.serialize(&mut buffer);
        buffer[..len].to_vec()
    }

    /// Parses exactly one serialized fingerprint.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FingerprintError> {
        if bytes.len() < HEADER_LEN {
            return Err(FingerprintError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        let kind = ValueKind::try_from(bytes[0])?;
        let mut length = [0u8; 8];
        length.copy_from_slice(&bytes[1..9]);
        let digest_len = bytes[9] as usize;
        if digest_len > DIGEST_CAPACITY {
            return Err(FingerprintError::DigestTooLong(digest_len));
        }
        let expected = HEADER_LEN + digest_len;
        if bytes.len() < expected {
            return Err(FingerprintError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(FingerprintError::TrailingBytes(bytes.len() - expected));
        }
        Self::new(kind, u64::from_le_bytes(length), &bytes[HEADER_LEN..])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind,
            self.encoding_length,
            hex::encode(self.digest())
        )
    }
}

/// Incremental 160-bit digest over serialized parts.
///
/// Compound values feed their children's serialized fingerprints through this
/// instead of re-serializing the children.
pub(crate) struct DigestHasher {
    inner: Sha256,
}

impl DigestHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    pub(crate) fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    pub(crate) fn update_count(&mut self, count: usize) {
        self.inner.update((count as u64).to_le_bytes());
    }

    pub(crate) fn update_fingerprint(&mut self, fingerprint: &Fingerprint) {
        let mut buffer = [0u8; SERIALIZED_CAPACITY];
        let len = fingerprint.serialize(&mut buffer);
        self.inner.update(&buffer[..len]);
    }

    /// SHA-256 truncated to 160 bits.
    pub(crate) fn finish(self, kind: ValueKind, encoding_length: u64) -> Fingerprint {
        let hash = self.inner.finalize();
        let mut digest = [0u8; DIGEST_CAPACITY];
        digest.copy_from_slice(&hash[..DIGEST_CAPACITY]);
        Fingerprint {
            kind,
            encoding_length,
            digest,
            digest_len: DIGEST_CAPACITY as u8,
        }
    }
}

/// JSON shape: digest as base64url without padding.
#[derive(Serialize, Deserialize)]
struct FingerprintJson {
    kind: ValueKind,
    encoding_length: u64,
    digest: String,
}

impl From<Fingerprint> for FingerprintJson {
    fn from(fingerprint: Fingerprint) -> Self {
        Self {
            kind: fingerprint.kind,
            encoding_length: fingerprint.encoding_length,
            digest: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(fingerprint.digest()),
        }
    }
}

impl TryFrom<FingerprintJson> for Fingerprint {
    type Error = FingerprintError;

    fn try_from(json: FingerprintJson) -> Result<Self, Self::Error> {
        let digest = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(json.digest.as_bytes())
            .map_err(|e| FingerprintError::InvalidDigestEncoding(e.to_string()))?;
        Fingerprint::new(json.kind, json.encoding_length, &digest)
    }
}
