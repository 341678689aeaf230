// src/handlers/customers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminSession,
    models::customer::{
        CreateCustomerPayload, CreatedCustomerResponse, Customer, MessageResponse,
        PasswordResetResponse, UpdateCustomerPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/auth/admin/create-customer",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Account created; the temporary password is returned once", body = CreatedCustomerResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Phone or username already registered")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let created = app_state.customer_service.create_account(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/auth/admin/customers",
    tag = "Customers",
    responses((status = 200, description = "All customer accounts, newest first", body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(app_state.customer_service.list().await?))
}

#[utoipa::path(
    put,
    path = "/api/auth/admin/customers/{id}",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Account updated", body = Customer),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Phone already registered")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<Json<Customer>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.customer_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/auth/admin/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "Customer not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.customer_service.delete(id).await?;
    Ok(Json(MessageResponse { message: "Account deleted".to_string() }))
}

#[utoipa::path(
    post,
    path = "/api/auth/admin/customers/{id}/reset-password",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "New temporary password", body = PasswordResetResponse),
        (status = 404, description = "Customer not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_customer_password(
    State(app_state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<PasswordResetResponse>, AppError> {
    let password = app_state.customer_service.reset_password(id).await?;
    Ok(Json(PasswordResetResponse { message: "Password reset".to_string(), password }))
}
