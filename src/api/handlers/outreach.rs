use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    api::{respond::ApiResponse, state::AppState},
    domain::{CreateOutreachRequest, Outreach, UpdateOutreachRequest},
    error::{AppError, Result},
};

pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Outreach>>> {
    let records = state.service_context.outreach_repo.list().await?;

    Ok(ApiResponse::fetched(records))
}

/// The most recently created outreach; the landing page and registration
/// wizard point at this one.
pub async fn latest(State(state): State<AppState>) -> Result<ApiResponse<Option<Outreach>>> {
    let outreach = state.service_context.outreach_repo.latest().await?;

    Ok(ApiResponse::fetched(outreach))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Outreach>> {
    let outreach = state
        .service_context
        .outreach_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Outreach not found".to_string()))?;

    Ok(ApiResponse::fetched(outreach))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOutreachRequest>,
) -> Result<ApiResponse<Outreach>> {
    let outreach = state.service_context.outreach_repo.create(request).await?;

    Ok(ApiResponse::added(outreach))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOutreachRequest>,
) -> Result<ApiResponse<Outreach>> {
    let outreach = state
        .service_context
        .outreach_repo
        .update(id, request)
        .await?;

    Ok(ApiResponse::updated(outreach))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>> {
    state.service_context.outreach_repo.delete(id).await?;

    Ok(ApiResponse::deleted())
}
