//! Titles, descriptions and tags.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use reel_models::{FullMetadata, PartMetadata};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    pub translated_parts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub part_metadata: Vec<PartMetadata>,
    pub full_metadata: FullMetadata,
    pub total_parts: usize,
}

pub async fn generate_metadata(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MetadataRequest>,
) -> ApiResult<Json<MetadataResponse>> {
    let parts = request
        .translated_parts
        .ok_or_else(|| ApiError::validation("Missing 'translated_parts' field in request"))?;
    if parts.is_empty() {
        return Err(ApiError::validation("translated_parts array cannot be empty"));
    }

    let (part_metadata, full_metadata) = state.metadata.generate(&parts);
    info!(parts = parts.len(), title = %full_metadata.title, "Metadata generated");

    Ok(Json(MetadataResponse {
        part_metadata,
        full_metadata,
        total_parts: parts.len(),
    }))
}
