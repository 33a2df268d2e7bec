use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::{respond::ApiResponse, state::AppState},
    auth::{AuthService, SESSION_COOKIE},
    domain::{RegisterUserRequest, User},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<ApiResponse<User>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.service_context.user_repo.create(request).await?;

    Ok(ApiResponse::added(user))
}

pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SigninRequest>,
) -> Result<(CookieJar, ApiResponse<User>)> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("invalid inputs".to_string()));
    }

    let password_hash = state
        .service_context
        .user_repo
        .password_hash(&request.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !AuthService::verify_password(&request.password, &password_hash).await? {
        return Err(AppError::Unauthorized);
    }

    let user = state
        .service_context
        .user_repo
        .find_by_email(&request.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let duration = state.settings.auth.session_duration_hours;
    let (_session, token) = state
        .service_context
        .auth_service
        .create_session(user.id, duration)
        .await?;

    let cookie = state
        .service_context
        .auth_service
        .create_session_cookie(&token, false);

    Ok((jar.add(cookie), ApiResponse::fetched(user)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        let _ = state
            .service_context
            .auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}
