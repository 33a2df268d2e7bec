use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard success envelope: `{ status, message, success, data? }`.
/// Constructors map the HTTP code to its stock message; `with_message`
/// overrides it for endpoints that say something more specific.
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    message: String,
    data: Option<T>,
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    status: u16,
    message: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn fetched(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: "Fetched successfully".to_string(),
            data: Some(data),
        }
    }

    pub fn added(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: "Added successfully".to_string(),
            data: Some(data),
        }
    }

    pub fn updated(data: T) -> Self {
        Self {
            status: StatusCode::ACCEPTED,
            message: "Updated successfully".to_string(),
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl ApiResponse<()> {
    pub fn deleted() -> Self {
        Self {
            status: StatusCode::OK,
            message: "Deleted successfully".to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            status: self.status.as_u16(),
            message: self.message,
            success: true,
            data: self.data,
        };
        (self.status, Json(envelope)).into_response()
    }
}
