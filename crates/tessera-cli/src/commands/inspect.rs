//! Inspect command implementation.

use tessera_canonical::CanonicalValue;

use crate::input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_value(input)?;
    println!("{}", value.inspect(true));
    Ok(())
}
