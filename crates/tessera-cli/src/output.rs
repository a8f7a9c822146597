//! Output formatting utilities.

use serde_json::Value;
use tessera_canonical::CanonicalValue;

/// Formats a JSON report.
pub fn format_json(report: &Value) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats the contract of a value as aligned `name: value` lines.
pub fn format_summary(value: &impl CanonicalValue) -> String {
    let rows = [
        ("kind", value.kind().to_string()),
        ("canonical", value.inspect(true)),
        ("encoding_length", value.encoding_length().to_string()),
        ("fingerprint", value.fingerprint().to_string()),
    ];
    rows.iter()
        .map(|(name, field)| format!("{:<16} {}\n", format!("{}:", name), field))
        .collect()
}
