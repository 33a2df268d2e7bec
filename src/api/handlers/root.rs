use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Almoner API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Registration and bank-transfer payment tracking for outreach events",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "api": "/api/v1",
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
