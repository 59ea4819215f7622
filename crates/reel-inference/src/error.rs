//! Inference client error types.

use thiserror::Error;

use reel_models::ErrorKind;

pub type InferenceResult<T> = Result<T, InferenceError>;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("{service} API timeout. Please try again.")]
    Timeout { service: &'static str },

    #[error("{service} API rate limit reached. Please wait a moment and try again.")]
    RateLimited { service: &'static str },

    /// Non-success HTTP status; `message` is the upstream `error` field when present.
    #[error("{service} API error: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Unexpected API response format: {0}")]
    InvalidResponse(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Unknown translator: {0}")]
    UnknownTranslator(String),

    #[error("No translators configured")]
    NoTranslators,
}

impl InferenceError {
    pub fn upstream(
        service: &'static str,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    /// Map a transport error, separating timeouts from other failures.
    pub fn from_reqwest(service: &'static str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout { service };
        }
        match error.status().map(|s| s.as_u16()) {
            Some(429) => Self::RateLimited { service },
            status => Self::upstream(service, status, error.to_string()),
        }
    }

    /// The remote model is still loading (HTTP 503).
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Upstream { status: Some(503), .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured(_) | Self::UnknownTranslator(_) | Self::NoTranslators => {
                ErrorKind::Internal
            }
            _ => ErrorKind::Upstream,
        }
    }
}
