//! Reading JSON input and mapping it onto canonical values.

use serde_json::Value as Json;
use std::io::{self, Read};
use tessera_canonical::{Dictionary, Integer, List, Value};

/// JSON that has no canonical value counterpart.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InputError {
    /// Fractional or exponent numbers have no canonical kind.
    #[error("non-integer number {number} at {path}")]
    NonIntegerNumber {
        /// Offending number as written.
        number: String,
        /// JSON path of the number.
        path: String,
    },
}

/// Reads JSON from a file or stdin and maps it onto a value.
pub fn read_value(input: Option<String>) -> Result<Value, Box<dyn std::error::Error>> {
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let json: Json = serde_json::from_str(&json_str).map_err(|e| format!("Invalid JSON: {}", e))?;
    Ok(to_value(&json, "root")?)
}

/// Maps JSON onto values: arrays become lists, objects text-keyed dictionaries.
pub fn to_value(json: &Json, path: &str) -> Result<Value, InputError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(flag) => Ok(Value::Boolean(*flag)),
        Json::Number(number) => {
            if let Some(n) = number.as_i64() {
                Ok(Value::from(n))
            } else if let Some(n) = number.as_u64() {
                Ok(Value::from(n))
            } else {
                // Numbers are kept verbatim, so wide integers parse without loss.
                let text = number.to_string();
                text.parse::<Integer>()
                    .map(Value::Integer)
                    .map_err(|_| InputError::NonIntegerNumber {
                        number: text,
                        path: path.to_string(),
                    })
            }
        }
        Json::String(text) => Ok(Value::text(text.as_str())),
        Json::Array(items) => {
            let values = items
                .iter()
                .enumerate()
                .map(|(idx, item)| to_value(item, &format!("{}[{}]", path, idx)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values.into_iter().collect::<List>()))
        }
        Json::Object(map) => {
            let mut dictionary = Dictionary::new();
            for (key, child) in map {
                let child = to_value(child, &format!("{}.{}", path, key))?;
                dictionary = dictionary.insert(key.as_str(), child);
            }
            Ok(Value::Dictionary(dictionary))
        }
    }
}
