//! The generation endpoint.

use axum::{extract::State, response::IntoResponse, Json};

use crate::dtos::GenerationRequest;
use crate::error::RelayError;
use crate::startup::AppState;

/// `POST /api/gemini`. Body parsing is delegated to the `Json` extractor;
/// everything after that is the caption service's job.
pub async fn generate_caption(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<impl IntoResponse, RelayError> {
    let reply = state.service.handle(request).await?;
    Ok(Json(reply))
}

/// Fallback for non-POST methods on the generation endpoint.
pub async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}
