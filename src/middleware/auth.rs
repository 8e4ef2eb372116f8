//! Request authentication extractors
//!
//! [`Actor`] is populated from the `Authorization: Bearer` header by
//! verifying the access token; it never touches the database. Handlers
//! that are administrator-only take [`AdminActor`] instead, which wraps
//! the same check with a role gate.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{Actor, UserRole};

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Unauthenticated(
                        "Authorization header with Bearer token required".to_string(),
                    )
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);
        let claims = jwt::verify_token(bearer.token(), auth_service.jwt_secret())
            .map_err(|_| ApiError::Unauthenticated("Invalid or expired token".to_string()))?;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthenticated("Invalid token subject".to_string()))?;

        let role = match claims.role.as_str() {
            "farmer" => UserRole::Farmer,
            "admin" => UserRole::Admin,
            _ => {
                return Err(ApiError::Unauthenticated(
                    "Unknown role in token".to_string(),
                ))
            }
        };

        Ok(Actor { id, role })
    }
}

/// An authenticated caller that has already passed the administrator gate.
pub struct AdminActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for AdminActor
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let actor = Actor::from_request_parts(parts, state).await?;
        if !actor.is_admin() {
            return Err(ApiError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        Ok(AdminActor(actor))
    }
}
