use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Reads and deserializes a JSON document of type `T` from `path`.
pub fn parse_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    let value = serde_json::from_str(&contents)?;
    Ok(value)
}
