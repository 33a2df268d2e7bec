use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{respond::ApiResponse, state::AppState},
    domain::{
        CreatePaymentRequest, Gender, Payment, PaymentFilter, PaymentSearchHit, PaymentStats,
        PaymentStatus, UpdatePaymentRequest,
    },
    error::{AppError, Result},
};

/// Query-string filter set. Every dimension treats `"*"` (or omission) as
/// "unfiltered"; set dimensions combine with AND.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub outreach: Option<String>,
    pub bank: Option<String>,
    pub gender: Option<String>,
}

/// Payment ids contain `/` ("KIT/001"), so row operations address the row
/// with a query parameter instead of a path segment.
#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "outreachId")]
    pub outreach_id: Option<String>,
}

fn sentinel(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "*")
}

impl ListParams {
    pub fn into_filter(self) -> Result<PaymentFilter> {
        let status = sentinel(self.status)
            .map(|s| {
                PaymentStatus::parse(&s)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid status filter: {}", s)))
            })
            .transpose()?;

        let gender = sentinel(self.gender)
            .map(|g| {
                Gender::parse(&g)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid gender filter: {}", g)))
            })
            .transpose()?;

        let outreach_id = sentinel(self.outreach)
            .map(|v| {
                Uuid::parse_str(&v)
                    .map_err(|_| AppError::BadRequest("Invalid outreach filter".to_string()))
            })
            .transpose()?;

        let bank_id = sentinel(self.bank)
            .map(|v| {
                Uuid::parse_str(&v)
                    .map_err(|_| AppError::BadRequest("Invalid bank filter".to_string()))
            })
            .transpose()?;

        Ok(PaymentFilter {
            q: sentinel(self.q),
            status,
            outreach_id,
            bank_id,
            gender,
        })
    }
}

fn require_id(params: IdParams) -> Result<String> {
    params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Invalid ID".to_string()))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Vec<Payment>>> {
    let filter = params.into_filter()?;
    let payments = state.service_context.payment_service.list(&filter).await?;

    Ok(ApiResponse::fetched(payments))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<ApiResponse<Payment>> {
    let payment = state.service_context.payment_service.create(request).await?;

    Ok(ApiResponse::added(payment))
}

/// Direct lookup by id. Soft-deleted rows are still returned here so admins
/// can audit removed registrations.
pub async fn find(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<ApiResponse<Payment>> {
    let id = require_id(params)?;
    let payment = state.service_context.payment_service.find(&id).await?;

    Ok(ApiResponse::fetched(payment))
}

pub async fn update(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<ApiResponse<Payment>> {
    let id = require_id(params)?;
    let payment = state
        .service_context
        .payment_service
        .update(&id, request)
        .await?;

    Ok(ApiResponse::updated(payment))
}

/// Move the accumulated pending amount into the paid amount.
pub async fn approve(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<ApiResponse<Payment>> {
    let id = require_id(params)?;
    let payment = state
        .service_context
        .payment_service
        .approve_pending(&id)
        .await?;

    Ok(ApiResponse::updated(payment))
}

pub async fn delete(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<ApiResponse<()>> {
    let id = require_id(params)?;
    state.service_context.payment_service.soft_delete(&id).await?;

    Ok(ApiResponse::deleted())
}

/// Public top-up submit: only a pending-amount increment, no identity
/// fields. The amount accumulates on the payment and awaits admin approval.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequest {
    pub pending_amount: f64,
}

pub async fn topup(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
    Json(request): Json<TopUpRequest>,
) -> Result<ApiResponse<Payment>> {
    let id = require_id(params)?;
    let payment = state
        .service_context
        .payment_service
        .update(
            &id,
            UpdatePaymentRequest {
                pending_amount: Some(request.pending_amount),
                ..Default::default()
            },
        )
        .await?;

    Ok(ApiResponse::updated(payment))
}

/// Public top-up lookup: find the latest registration for a contact within
/// one outreach, without authentication.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<ApiResponse<PaymentSearchHit>> {
    let (query, outreach_id) = match (sentinel(params.q), sentinel(params.outreach_id)) {
        (Some(q), Some(o)) => (q, o),
        _ => {
            return Err(AppError::BadRequest(
                "Both query and outreach ID query params have to be specified.".to_string(),
            ))
        }
    };

    let outreach_id = Uuid::parse_str(&outreach_id)
        .map_err(|_| AppError::BadRequest("Invalid outreach ID".to_string()))?;

    let hit = state
        .service_context
        .payment_service
        .search_contact(&query, outreach_id)
        .await?;

    Ok(ApiResponse::fetched(hit))
}

/// Dashboard aggregates, scoped by the same free-text/outreach predicate as
/// the list endpoint.
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<PaymentStats>> {
    let filter = params.into_filter()?;
    let stats = state.service_context.payment_service.stats(&filter).await?;

    Ok(ApiResponse::fetched(stats))
}
