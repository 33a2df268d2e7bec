use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    api::{handlers::payments::ListParams, state::AppState},
    error::{AppError, Result},
    export::payments_workbook,
};

/// Stream the filtered payment rows as an .xlsx attachment.
pub async fn excel(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let filter = params.into_filter()?;
    let records = state.service_context.payment_service.list(&filter).await?;

    if records.is_empty() {
        return Err(AppError::NotFound("No records found".to_string()));
    }

    let buffer = payments_workbook(&records)?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=payments.xlsx",
            ),
        ],
        buffer,
    ))
}
