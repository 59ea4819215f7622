//! PDF text extraction.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractTextRequest {
    /// Base64-encoded PDF
    pub file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
    pub pages: usize,
    pub extracted_pages: usize,
    pub characters: usize,
}

pub async fn extract_text(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExtractTextRequest>,
) -> ApiResult<Json<ExtractTextResponse>> {
    let file = request
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ApiError::validation("No file uploaded"))?;
    let bytes = codec::decode("file", &file)?;

    let extracted = state.pdf.extract(&bytes).await?;
    info!(
        pages = extracted.pages,
        extracted_pages = extracted.extracted_pages,
        characters = extracted.characters,
        "PDF text extracted"
    );

    Ok(Json(ExtractTextResponse {
        text: extracted.text,
        pages: extracted.pages,
        extracted_pages: extracted.extracted_pages,
        characters: extracted.characters,
    }))
}
