// src/handlers/products.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminSession, BearerCredential},
    models::{
        pricing::{LookupQuery, TierLookupResponse},
        product::{
            CategoryList, CreateProductPayload, ProductMessageResponse, ProductRecord,
            UpdateProductPayload,
        },
    },
};

// ---
// Tiered price lookup (public, optional bearer token)
// ---

#[utoipa::path(
    get,
    path = "/api/products/{tierCode}",
    tag = "Products",
    params(
        ("tierCode" = String, Path, description = "One of BBCL, BBPT, BL, BLVIP, HONDA247 (any case)"),
        LookupQuery
    ),
    responses(
        (status = 200, description = "One page of products priced for the tier", body = TierLookupResponse),
        (status = 400, description = "Unknown tier code"),
        (status = 403, description = "Customer is not entitled to this tier")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn lookup_by_tier(
    State(app_state): State<AppState>,
    credential: BearerCredential,
    Path(tier_code): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<TierLookupResponse>, AppError> {
    let response = app_state
        .lookup_service
        .lookup(&tier_code, credential.as_deref(), &query)
        .await?;
    Ok(Json(response))
}

// ---
// Catalogue reads
// ---

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Every product, ordered by code", body = Vec<ProductRecord>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProductRecord>>, AppError> {
    Ok(Json(app_state.product_service.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/products/code/{code}",
    tag = "Products",
    params(("code" = String, Path, description = "Product code")),
    responses(
        (status = 200, description = "Product found", body = ProductRecord),
        (status = 404, description = "No product with this code")
    )
)]
pub async fn get_product_by_code(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ProductRecord>, AppError> {
    Ok(Json(app_state.product_service.get_by_code(&code).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/categories/parent",
    tag = "Products",
    responses((status = 200, description = "Distinct parent categories", body = CategoryList))
)]
pub async fn list_parent_categories(
    State(app_state): State<AppState>,
) -> Result<Json<CategoryList>, AppError> {
    let categories = app_state.product_service.parent_categories().await?;
    Ok(Json(CategoryList { categories }))
}

#[utoipa::path(
    get,
    path = "/api/products/categories/{parentCategory}/subcategories",
    tag = "Products",
    params(("parentCategory" = String, Path, description = "Parent category name")),
    responses((status = 200, description = "Distinct subcategories under the parent", body = CategoryList))
)]
pub async fn list_subcategories(
    State(app_state): State<AppState>,
    Path(parent_category): Path<String>,
) -> Result<Json<CategoryList>, AppError> {
    let categories = app_state.product_service.subcategories(&parent_category).await?;
    Ok(Json(CategoryList { categories }))
}

// ---
// Catalogue writes (admin)
// ---

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Product created", body = ProductMessageResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Product code already exists")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.product_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductMessageResponse {
            message: "Product created".to_string(),
            product: Some(product),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product updated", body = ProductMessageResponse),
        (status = 404, description = "Product not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<ProductMessageResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.product_service.update(id, payload).await?;
    Ok(Json(ProductMessageResponse {
        message: "Product updated".to_string(),
        product: Some(product),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ProductMessageResponse),
        (status = 404, description = "Product not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductMessageResponse>, AppError> {
    app_state.product_service.delete(id).await?;
    Ok(Json(ProductMessageResponse { message: "Product deleted".to_string(), product: None }))
}
