use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    api::{respond::ApiResponse, state::AppState},
    domain::{BankDetail, CreateBankRequest, UpdateBankRequest},
    error::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<BankDetail>>> {
    let accounts = state.service_context.bank_repo.list(false).await?;

    Ok(ApiResponse::fetched(accounts))
}

/// Accounts shown on the public registration form.
pub async fn list_public(State(state): State<AppState>) -> Result<ApiResponse<Vec<BankDetail>>> {
    let accounts = state.service_context.bank_repo.list(true).await?;

    Ok(ApiResponse::fetched(accounts))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateBankRequest>,
) -> Result<ApiResponse<BankDetail>> {
    let account = state.service_context.bank_repo.create(request).await?;

    Ok(ApiResponse::added(account))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBankRequest>,
) -> Result<ApiResponse<BankDetail>> {
    let account = state.service_context.bank_repo.update(id, request).await?;

    Ok(ApiResponse::updated(account))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>> {
    state.service_context.bank_repo.delete(id).await?;

    Ok(ApiResponse::deleted())
}
