//! Arbitrary-precision integer values.
//!
//! Canonical encoding is `i` + decimal digits + `e`, with a single `-` for negative
//! values and no leading zeros.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::{ConversionError, FormatError};
use crate::fingerprint::Fingerprint;
use crate::format::NumberFormat;
use crate::kind::ValueKind;
use crate::value::CanonicalValue;

/// Immutable arbitrary-precision signed integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Integer(BigInt);

impl Integer {
    /// Parses decimal text under `format`.
    pub fn parse_with(text: &str, format: &NumberFormat) -> Result<Self, FormatError> {
        let trimmed = format.trim(text);
        if trimmed.is_empty() {
            tracing::debug!(text, "rejected empty integer literal");
            return Err(FormatError::Empty);
        }
        let leading = if format.allow_leading_whitespace {
            text.len() - text.trim_start().len()
        } else {
            0
        };
        let (negative, digits) = format.split_sign(trimmed);
        if digits.is_empty() {
            tracing::debug!(text, "rejected integer literal without digits");
            return Err(FormatError::MissingDigits {
                value: text.to_string(),
            });
        }
        if let Some((offset, found)) = digits.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
            let index = leading + (trimmed.len() - digits.len()) + offset;
            tracing::debug!(text, index, "rejected integer literal");
            return Err(FormatError::InvalidCharacter {
                value: text.to_string(),
                index,
                found,
            });
        }
        let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| {
            FormatError::MissingDigits {
                value: text.to_string(),
            }
        })?;
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Ok(Self(BigInt::from_biguint(sign, magnitude)))
    }

    /// Borrows the underlying arbitrary-precision value.
    pub fn as_big_int(&self) -> &BigInt {
        &self.0
    }

    /// Unwraps the underlying arbitrary-precision value.
    pub fn into_big_int(self) -> BigInt {
        self.0
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of decimal digits in the canonical text, sign excluded.
    pub fn digit_count(&self) -> u64 {
        let magnitude = self.0.magnitude();
        match magnitude.to_u64() {
            Some(n) if n < 10 => 1,
            Some(n) if n < 100 => 2,
            Some(n) if n < 1_000 => 3,
            Some(n) if n < 10_000 => 4,
            Some(n) => u64::from(n.ilog10()) + 1,
            None => magnitude.to_str_radix(10).len() as u64,
        }
    }

    /// Minimal little-endian two's-complement bytes (`[0x00]` for zero).
    pub fn to_signed_bytes_le(&self) -> Vec<u8> {
        self.0.to_signed_bytes_le()
    }

    /// Low 64 bits of the two's-complement representation.
    fn low_bits(&self) -> u64 {
        let bytes = self.0.to_signed_bytes_le();
        let fill = if self.0.sign() == Sign::Minus { 0xff } else { 0x00 };
        let mut buffer = [fill; 8];
        let n = bytes.len().min(8);
        buffer[..n].copy_from_slice(&bytes[..n]);
        u64::from_le_bytes(buffer)
    }
}

// Narrowing conversions that silently discard high-order bits, exactly like an
// `as` cast between fixed-width integers. Use `TryFrom` for a checked conversion.
macro_rules! wrapping_conversions {
    ($($name:ident => $target:ty),* $(,)?) => {
        impl Integer {
            $(
                #[doc = concat!(
                    "Truncates to `", stringify!($target),
                    "` by two's-complement wrapping; high-order bits are discarded."
                )]
                pub fn $name(&self) -> $target {
                    self.low_bits() as $target
                }
            )*
        }
    };
}

wrapping_conversions!(
    to_i16_wrapping => i16,
    to_u16_wrapping => u16,
    to_i32_wrapping => i32,
    to_u32_wrapping => u32,
    to_i64_wrapping => i64,
    to_u64_wrapping => u64,
);

macro_rules! checked_conversions {
    ($($target:ty => $method:ident),* $(,)?) => {
        $(
            impl TryFrom<&Integer> for $target {
                type Error = ConversionError;

                fn try_from(value: &Integer) -> Result<Self, Self::Error> {
                    value.0.$method().ok_or_else(|| ConversionError::OutOfRange {
                        target: stringify!($target),
                        value: value.to_string(),
                    })
                }
            }

            impl TryFrom<Integer> for $target {
                type Error = ConversionError;

                fn try_from(value: Integer) -> Result<Self, Self::Error> {
                    <$target>::try_from(&value)
                }
            }
        )*
    };
}

checked_conversions!(
    i16 => to_i16,
    u16 => to_u16,
    i32 => to_i32,
    u32 => to_u32,
    i64 => to_i64,
    u64 => to_u64,
);

macro_rules! native_interop {
    ($($native:ty),* $(,)?) => {
        $(
            impl From<$native> for Integer {
                fn from(value: $native) -> Self {
                    Self(BigInt::from(value))
                }
            }

            impl PartialEq<$native> for Integer {
                fn eq(&self, other: &$native) -> bool {
                    self.0 == BigInt::from(*other)
                }
            }

            impl PartialEq<Integer> for $native {
                fn eq(&self, other: &Integer) -> bool {
                    BigInt::from(*self) == other.0
                }
            }

            impl PartialOrd<$native> for Integer {
                fn partial_cmp(&self, other: &$native) -> Option<Ordering> {
                    Some(self.0.cmp(&BigInt::from(*other)))
                }
            }

            impl PartialOrd<Integer> for $native {
                fn partial_cmp(&self, other: &Integer) -> Option<Ordering> {
                    Some(BigInt::from(*self).cmp(&other.0))
                }
            }
        )*
    };
}

native_interop!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<Integer> for BigInt {
    fn from(value: Integer) -> Self {
        value.0
    }
}

impl From<Integer> for String {
    fn from(value: Integer) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for Integer {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Integer::parse_with(&value, &NumberFormat::strict())
    }
}

impl FromStr for Integer {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Integer::parse_with(s, &NumberFormat::invariant())
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl CanonicalValue for Integer {
    fn kind(&self) -> ValueKind {
        ValueKind::Integer
    }

    /// `2 + digit_count()`: one marker byte, one terminator byte, the digits.
    fn encoding_length(&self) -> u64 {
        2 + self.digit_count()
    }

    fn fingerprint(&self) -> Fingerprint {
        Fingerprint::raw_or_hashed(
            ValueKind::Integer,
            self.encoding_length(),
            &self.0.to_signed_bytes_le(),
        )
    }

    fn inspect(&self, _load_all: bool) -> String {
        self.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(text: &str) -> Integer {
        text.parse().unwrap()
    }

    #[test]
    fn encoding_length_counts_digits() {
        assert_eq!(Integer::from(0).encoding_length(), 3);
        assert_eq!(Integer::from(9).encoding_length(), 3);
        assert_eq!(Integer::from(10).encoding_length(), 4);
        assert_eq!(Integer::from(-5).encoding_length(), 3);
        assert_eq!(Integer::from(100).encoding_length(), 5);
        assert_eq!(Integer::from(12345).encoding_length(), 7);
        assert_eq!(Integer::from(u64::MAX).encoding_length(), 22);
    }

    #[test]
    fn digit_count_is_exact_around_thresholds() {
        for exponent in 0..60u32 {
            let power = BigInt::from(10u8).pow(exponent);
            let below = Integer::from(&power - 1u8);
            let at = Integer::from(power.clone());
            assert_eq!(below.digit_count(), u64::from(exponent.max(1)));
            assert_eq!(at.digit_count(), u64::from(exponent) + 1);
            assert_eq!(Integer::from(-power).digit_count(), u64::from(exponent) + 1);
        }
    }

    #[test]
    fn parse_normalizes_to_canonical_text() {
        assert_eq!(int("007").to_string(), "7");
        assert_eq!(int("-0").to_string(), "0");
        assert_eq!(int("+42").to_string(), "42");
        assert_eq!(int("  -000123 ").to_string(), "-123");
        assert_eq!(int("-0").inspect(false), "0");
    }

    #[test]
    fn parse_rejects_malformed_literals() {
        assert_eq!("".parse::<Integer>(), Err(FormatError::Empty));
        assert_eq!("   ".parse::<Integer>(), Err(FormatError::Empty));
        assert_eq!(
            "12a".parse::<Integer>(),
            Err(FormatError::InvalidCharacter {
                value: "12a".into(),
                index: 2,
                found: 'a'
            })
        );
        assert_eq!(
            "--1".parse::<Integer>(),
            Err(FormatError::InvalidCharacter {
                value: "--1".into(),
                index: 1,
                found: '-'
            })
        );
        assert_eq!(
            "-".parse::<Integer>(),
            Err(FormatError::MissingDigits { value: "-".into() })
        );
        assert!("1 2".parse::<Integer>().is_err());
        assert!("1_000".parse::<Integer>().is_err());
        assert!("١٢".parse::<Integer>().is_err());
    }

    #[test]
    fn strict_format_rejects_whitespace() {
        let strict = NumberFormat::strict();
        assert!(Integer::parse_with(" 1", &strict).is_err());
        assert!(Integer::parse_with("1 ", &strict).is_err());
        assert_eq!(Integer::parse_with("-1", &strict).unwrap(), -1i32);
    }

    #[test]
    fn custom_signs_are_honored() {
        let format = NumberFormat {
            negative_sign: "\u{2212}".to_string(),
            ..NumberFormat::invariant()
        };
        assert_eq!(Integer::parse_with("\u{2212}12", &format).unwrap(), -12i64);
        assert!(Integer::parse_with("-12", &format).is_err());
    }

    #[test]
    fn small_values_use_raw_twos_complement_digest() {
        assert_eq!(Integer::from(0).fingerprint().digest(), &[0x00]);
        assert_eq!(Integer::from(100).fingerprint().digest(), &[0x64]);
        assert_eq!(Integer::from(128).fingerprint().digest(), &[0x80, 0x00]);
        assert_eq!(Integer::from(-1).fingerprint().digest(), &[0xff]);
        assert_eq!(Integer::from(-129).fingerprint().digest(), &[0x7f, 0xff]);
    }

    #[test]
    fn digest_switches_to_hash_past_twenty_bytes() {
        let fifteen = Integer::from(BigInt::from(1u8) << (8 * 14usize));
        assert_eq!(fifteen.to_signed_bytes_le().len(), 15);
        assert_eq!(fifteen.fingerprint().digest(), &fifteen.to_signed_bytes_le()[..]);

        let twenty = Integer::from(BigInt::from(1u8) << (8 * 19usize));
        assert_eq!(twenty.to_signed_bytes_le().len(), 20);
        assert_eq!(twenty.fingerprint().digest(), &twenty.to_signed_bytes_le()[..]);

        let twenty_five = Integer::from(BigInt::from(1u8) << (8 * 24usize));
        assert_eq!(twenty_five.to_signed_bytes_le().len(), 25);
        let digest = twenty_five.fingerprint();
        assert_eq!(digest.digest().len(), 20);
        assert_ne!(digest.digest(), &twenty_five.to_signed_bytes_le()[..20]);
    }

    #[test]
    fn fingerprint_matches_across_constructors() {
        assert_eq!(Integer::from(100u8).fingerprint(), int("100").fingerprint());
        assert_eq!(Integer::from(-7i16).fingerprint(), int("-007").fingerprint());
        assert_ne!(Integer::from(1).fingerprint(), Integer::from(-1).fingerprint());
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(int("-1") < int("0"));
        assert!(int("0") < int("1"));
        assert!(int("1") < int("100"));
        assert!(int("99999999999999999999999") > Integer::from(u64::MAX));
        assert!(Integer::from(5) > 4u8);
        assert!(-3i64 < Integer::from(0));
        assert_eq!(Integer::from(12), 12u64);
    }

    #[test]
    fn wrapping_conversions_truncate() {
        let value = Integer::from(0x1_2345_6789i64);
        assert_eq!(value.to_i32_wrapping(), 0x2345_6789);
        assert_eq!(value.to_u16_wrapping(), 0x6789);
        assert_eq!(Integer::from(-1).to_u64_wrapping(), u64::MAX);
        assert_eq!(Integer::from(-1).to_u16_wrapping(), u16::MAX);
        assert_eq!(Integer::from(65_536 + 5).to_i16_wrapping(), 5);
        assert_eq!(Integer::from(u32::MAX).to_i32_wrapping(), -1);
        let huge = Integer::from((BigInt::from(1u8) << 100u32) + 42u8);
        assert_eq!(huge.to_u64_wrapping(), 42);
        assert_eq!(huge.to_i64_wrapping(), 42);
        let huge_negative = Integer::from(-(BigInt::from(1u8) << 100u32));
        assert_eq!(huge_negative.to_i64_wrapping(), 0);
        assert_eq!(Integer::from(i64::MIN).to_i64_wrapping(), i64::MIN);
    }

    #[test]
    fn checked_conversions_report_overflow() {
        assert_eq!(i16::try_from(&Integer::from(-300)), Ok(-300));
        assert_eq!(
            u16::try_from(Integer::from(-1)),
            Err(ConversionError::OutOfRange {
                target: "u16",
                value: "-1".into()
            })
        );
        assert!(i64::try_from(&Integer::from(u64::MAX)).is_err());
        assert_eq!(u64::try_from(&Integer::from(u64::MAX)), Ok(u64::MAX));
    }

    #[test]
    fn serializes_as_canonical_string() {
        assert_eq!(serde_json::to_string(&int("-0042")).unwrap(), r#""-42""#);
        let parsed: Integer = serde_json::from_str(r#""123456789012345678901234567890""#).unwrap();
        assert_eq!(parsed.digit_count(), 30);
        assert!(serde_json::from_str::<Integer>(r#"" 1""#).is_err());
    }
}
