//! JSON serialization helpers.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value to deterministic, human-editable JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Serializes a value to single-line JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_compact<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(value)?)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use forday_domain::ClientSettings;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stable_output_shape() {
        let json = to_json_stable(&ClientSettings::default()).unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\n  \"base_url\": \"http://localhost:8080\""));
        // Declaration order is preserved.
        assert!(json.find("base_url").unwrap() < json.find("refresh_path").unwrap());
    }

    #[test]
    fn test_compact_output_is_one_line() {
        let json = to_json_compact(&ClientSettings::default()).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let settings: ClientSettings = from_json(r#"{"base_url": "https://api.forday.app"}"#).unwrap();
        assert_eq!(settings.base_url, "https://api.forday.app");
        assert_eq!(settings.refresh_path, "/auth/refresh");
    }

    #[test]
    fn test_from_json_bytes_rejects_invalid() {
        let result: Result<ClientSettings, _> = from_json_bytes(b"{\"max_auth_retries\": -1}");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
