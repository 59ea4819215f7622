//! Base64 transport of binary payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ApiError, ApiResult};

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a base64 payload. A `data:<mime>;base64,` prefix and embedded
/// whitespace are tolerated.
pub fn decode(field: &str, value: &str) -> ApiResult<Vec<u8>> {
    let payload = match value.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => value,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ApiError::decode(format!("Invalid base64 in '{field}': {e}")))
}

/// Decode an optional payload that must be present.
pub fn decode_required(field: &str, value: Option<&str>) -> ApiResult<Vec<u8>> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => decode(field, v),
        _ => Err(ApiError::decode(format!("Missing '{field}' data"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_variants() {
        assert_eq!(decode("file", "aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode("file", "data:application/pdf;base64,aGVs\nbG8=").unwrap(), b"hello");
        assert_eq!(decode("file", &encode(b"\x00\xff")).unwrap(), b"\x00\xff");
    }

    #[test]
    fn test_decode_errors() {
        let err = decode("image", "not base64!").unwrap_err();
        assert!(err.to_string().starts_with("Invalid base64 in 'image'"));
        assert_eq!(
            decode_required("audio", None).unwrap_err().to_string(),
            "Missing 'audio' data"
        );
        assert!(decode_required("audio", Some("  ")).is_err());
    }
}
