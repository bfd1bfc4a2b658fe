//! Structured data conversions: JSON includes, YAML parsing and dumping

use thiserror::Error;

/// Errors from the JSON/YAML codecs
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Re-serialize JSON text as YAML so it can be spliced into a YAML template.
///
/// Key order of the JSON document is preserved.
pub fn json_to_yaml(text: &str) -> Result<String, CodecError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(serde_yaml::to_string(&value)?)
}

/// Parse resolved template text into a YAML tree
pub fn parse_yaml(text: &str) -> Result<serde_yaml::Value, CodecError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Dump a YAML tree back to text
pub fn dump_yaml(value: &serde_yaml::Value) -> Result<String, CodecError> {
    Ok(serde_yaml::to_string(value)?)
}
