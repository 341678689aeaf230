use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{AdminLoginPayload, AuthResponse, CustomerLoginPayload},
};

#[utoipa::path(
    post,
    path = "/api/auth/admin-login",
    tag = "Auth",
    request_body = AdminLoginPayload,
    responses(
        (status = 200, description = "Admin token issued (valid 24 h)", body = AuthResponse),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn admin_login(
    State(app_state): State<AppState>,
    Json(payload): Json<AdminLoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state.auth_service.admin_login(&payload.password)?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/customer-login",
    tag = "Auth",
    request_body = CustomerLoginPayload,
    responses(
        (status = 200, description = "Customer token issued (valid 12 h)", body = AuthResponse),
        (status = 401, description = "Unknown username or wrong password")
    )
)]
pub async fn customer_login(
    State(app_state): State<AppState>,
    Json(payload): Json<CustomerLoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .auth_service
        .customer_login(&payload.username, &payload.password)
        .await?;
    Ok(Json(response))
}
