//! Shared HTTP plumbing for the inference clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::error::{InferenceError, InferenceResult};

pub(crate) fn build_client(service: &'static str, timeout: Duration) -> InferenceResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| InferenceError::from_reqwest(service, e))
}

/// Turn a non-success response into an error, preferring the upstream
/// `error` field over the raw body.
pub(crate) async fn check_status(
    service: &'static str,
    response: Response,
) -> InferenceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(InferenceError::RateLimited { service });
    }

    let body = response.text().await.unwrap_or_default();
    Err(InferenceError::upstream(
        service,
        Some(status.as_u16()),
        error_message(status, &body),
    ))
}

fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| match v.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) if !other.is_null() => Some(other.to_string()),
        _ => None,
    });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => format!("HTTP {}", status.as_u16()),
        None => format!("HTTP {}: {}", status.as_u16(), body.trim()),
    }
}

/// Split text into chunks of at most `max_chars` characters, breaking on
/// whitespace. A single word longer than the limit is cut.
pub(crate) fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let word_len = word.chars().count();
            let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };

            if needed <= max_chars {
                if current_len > 0 {
                    current.push(' ');
                }
                current.push_str(word);
                current_len = needed;
                break;
            }
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }

            let split = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            chunks.push(word[..split].to_string());
            word = &word[split..];
            if word.is_empty() {
                break;
            }
        }
    }
    if current_len > 0 {
        chunks.push(current);
    }
    chunks
}
