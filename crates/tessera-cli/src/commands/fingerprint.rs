//! Fingerprint command implementation.

use tessera_canonical::CanonicalValue;

use crate::{input, output};

pub fn run(input: Option<String>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_value(input)?;
    let fingerprint = value.fingerprint();

    if json {
        println!("{}", output::format_json(&serde_json::to_value(fingerprint)?));
    } else {
        println!("{}", fingerprint);
    }
    Ok(())
}
