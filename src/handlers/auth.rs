//! HTTP handlers for registration and login

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::auth::{AuthTokenResponse, LoginRequest, RegisterRequest};
use crate::models::{Actor, ApiResponse, UserResponse};

pub async fn register(
    State(service): State<Arc<AuthService>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthTokenResponse>>), ApiError> {
    let tokens = service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tokens))))
}

pub async fn login(
    State(service): State<Arc<AuthService>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthTokenResponse>>, ApiError> {
    let tokens = service.login(payload).await?;
    Ok(Json(ApiResponse::success(tokens)))
}

pub async fn me(
    State(service): State<Arc<AuthService>>,
    actor: Actor,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = service.get_user(actor.id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}
