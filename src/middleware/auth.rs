// src/middleware/auth.rs

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::auth::Principal};

/// The raw bearer token, if the request carried one. Never rejects: public
/// reads treat a missing or malformed header the same as no credential.
/// Parsed exactly like `AdminSession` so both routes agree on what a token is.
#[derive(Debug, Clone, Default)]
pub struct BearerCredential(pub Option<String>);

impl BearerCredential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerCredential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
            .filter(|token| !token.is_empty());

        Ok(BearerCredential(token))
    }
}

/// Guard for admin-only routes. A missing or invalid token is a 401, a valid
/// token that is not an admin's is a 403.
#[derive(Debug, Clone)]
pub struct AdminSession;

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::InvalidToken)?;

        let app_state = AppState::from_ref(state);
        match app_state.auth_service.decode_principal(bearer.token())? {
            Principal::Admin => Ok(AdminSession),
            _ => {
                tracing::info!("Non-admin token used on an admin route");
                Err(AppError::AdminRequired)
            }
        }
    }
}
