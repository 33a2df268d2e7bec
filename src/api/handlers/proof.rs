use axum::{
    extract::{Multipart, Query, State},
};

use crate::{
    api::{handlers::payments::IdParams, respond::ApiResponse, state::AppState},
    error::{AppError, Result},
    storage::StoredAsset,
};

/// Accept a proof-of-payment image as a multipart `file` field, push it to
/// the configured storage provider, and append the resulting asset id to the
/// payment's proof list when an id accompanies the request. The upload is
/// fire-and-forget: provider failures surface directly to the caller.
pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    mut multipart: Multipart,
) -> Result<ApiResponse<StoredAsset>> {
    let mut stored: Option<StoredAsset> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(|f| f.to_string())
                .ok_or_else(|| AppError::BadRequest("Invalid filename".to_string()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            stored = Some(state.storage.store(&filename, &data).await?);
            break;
        }
    }

    let asset = stored.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    if let Some(id) = params.id.filter(|id| !id.is_empty()) {
        state
            .service_context
            .payment_service
            .append_proof(&id, &asset.asset_id)
            .await?;
    }

    Ok(ApiResponse::fetched(asset).with_message("File uploaded"))
}
