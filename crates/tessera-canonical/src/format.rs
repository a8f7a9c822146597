use serde::{Deserialize, Serialize};

/// Rules for reading decimal integer text.
///
/// The default is locale-invariant: ASCII `+`/`-` signs, leading and trailing
/// whitespace tolerated. Digits are always ASCII `0`-`9`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Symbol accepted as an explicit positive sign.
    pub positive_sign: String,
    /// Symbol marking a negative value.
    pub negative_sign: String,
    /// Whether a single leading sign symbol is accepted at all.
    pub allow_leading_sign: bool,
    /// Whether whitespace before the literal is skipped.
    pub allow_leading_whitespace: bool,
    /// Whether whitespace after the literal is skipped.
    pub allow_trailing_whitespace: bool,
}

impl NumberFormat {
    /// Locale-invariant format (the default).
    pub fn invariant() -> Self {
        Self {
            positive_sign: "+".to_string(),
            negative_sign: "-".to_string(),
            allow_leading_sign: true,
            allow_leading_whitespace: true,
            allow_trailing_whitespace: true,
        }
    }

    /// Invariant signs with no whitespace tolerance.
    pub fn strict() -> Self {
        Self {
            allow_leading_whitespace: false,
            allow_trailing_whitespace: false,
            ..Self::invariant()
        }
    }

    /// Splits `text` into (is_negative, digits) without validating the digits.
    pub(crate) fn split_sign<'a>(&self, text: &'a str) -> (bool, &'a str) {
        if !self.allow_leading_sign {
            return (false, text);
        }
        if !self.negative_sign.is_empty() {
            if let Some(rest) = text.strip_prefix(self.negative_sign.as_str()) {
                return (true, rest);
            }
        }
        if !self.positive_sign.is_empty() {
            if let Some(rest) = text.strip_prefix(self.positive_sign.as_str()) {
                return (false, rest);
            }
        }
        (false, text)
    }

    /// Removes the whitespace this format tolerates.
    pub(crate) fn trim<'a>(&self, text: &'a str) -> &'a str {
        let mut text = text;
        if self.allow_leading_whitespace {
            text = text.trim_start();
        }
        if self.allow_trailing_whitespace {
            text = text.trim_end();
        }
        text
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::invariant()
    }
}
