//! Product price-lookup backend: one catalogue, five customer price tiers.

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

/// Builds the full HTTP surface over an already wired state.
pub fn router(app_state: AppState) -> Router {
    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/code/{code}", get(handlers::products::get_product_by_code))
        .route("/categories/parent", get(handlers::products::list_parent_categories))
        .route(
            "/categories/{parent_category}/subcategories",
            get(handlers::products::list_subcategories),
        )
        // Same segment: GET takes a tier code, PUT/DELETE take a product id.
        .route(
            "/{id}",
            get(handlers::products::lookup_by_tier)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let auth_routes = Router::new()
        .route("/admin-login", post(handlers::auth::admin_login))
        .route("/customer-login", post(handlers::auth::customer_login))
        .route("/admin/create-customer", post(handlers::customers::create_customer))
        .route("/admin/customers", get(handlers::customers::list_customers))
        .route(
            "/admin/customers/{id}",
            put(handlers::customers::update_customer).delete(handlers::customers::delete_customer),
        )
        .route(
            "/admin/customers/{id}/reset-password",
            post(handlers::customers::reset_customer_password),
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/products", product_routes)
        .nest("/api/auth", auth_routes)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
