use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    api::{respond::ApiResponse, state::AppState},
    domain::{RegistrationDraft, UpsertDraftRequest},
    error::{AppError, Result},
};

/// Save (or replace) the wizard's in-progress state under a client token so
/// an attendee can resume after a reload.
pub async fn upsert(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    Json(request): Json<UpsertDraftRequest>,
) -> Result<ApiResponse<RegistrationDraft>> {
    let draft = state
        .service_context
        .draft_repo
        .upsert(token, request)
        .await?;

    Ok(ApiResponse::updated(draft))
}

pub async fn get(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<ApiResponse<RegistrationDraft>> {
    let draft = state
        .service_context
        .draft_repo
        .find(token)
        .await?
        .ok_or_else(|| AppError::NotFound("Draft not found".to_string()))?;

    Ok(ApiResponse::fetched(draft))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<ApiResponse<()>> {
    state.service_context.draft_repo.delete(token).await?;

    Ok(ApiResponse::deleted())
}
