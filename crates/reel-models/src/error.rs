//! Error classification shared across crates.

use serde::Serialize;

/// Coarse error category. Callers branch on the kind, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed request field.
    Validation,
    /// Request body above the configured limit.
    PayloadTooLarge,
    /// Remote inference service failed, was rate limited or answered garbage.
    Upstream,
    /// Invalid base64 or undecodable media.
    Decode,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::PayloadTooLarge => "payload_too_large",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Decode => "decode",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
