//! Integer command implementation.

use serde_json::json;
use tessera_canonical::{CanonicalValue, Integer, NumberFormat};

use crate::output;

pub fn run(
    text: String,
    format: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let number_format = match format {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read format file {}: {}", path, e))?;
            serde_json::from_str::<NumberFormat>(&raw)
                .map_err(|e| format!("Invalid number format: {}", e))?
        }
        None => NumberFormat::invariant(),
    };
    tracing::debug!(?number_format, "parsing integer");

    let integer = Integer::parse_with(&text, &number_format)
        .map_err(|e| format!("Invalid integer: {}", e))?;

    if json {
        let report = json!({
            "canonical": integer.to_string(),
            "encoding_length": integer.encoding_length(),
            "fingerprint": integer.fingerprint(),
        });
        println!("{}", output::format_json(&report));
    } else {
        print!("{}", output::format_summary(&integer));
    }
    Ok(())
}
