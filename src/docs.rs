// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Products ---
        handlers::products::lookup_by_tier,
        handlers::products::list_products,
        handlers::products::get_product_by_code,
        handlers::products::list_parent_categories,
        handlers::products::list_subcategories,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Auth ---
        handlers::auth::admin_login,
        handlers::auth::customer_login,

        // --- Customers ---
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::reset_customer_password,
    ),
    components(
        schemas(
            // --- Pricing ---
            models::pricing::TierCode,
            models::pricing::PriceView,
            models::pricing::PaginationMeta,
            models::pricing::TierLookupResponse,

            // --- Products ---
            models::product::Product,
            models::product::ProductRecord,
            models::product::TierPrices,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::product::ProductMessageResponse,
            models::product::CategoryList,

            // --- Auth ---
            models::auth::AdminLoginPayload,
            models::auth::CustomerLoginPayload,
            models::auth::AuthResponse,

            // --- Customers ---
            models::customer::Customer,
            models::customer::CreateCustomerPayload,
            models::customer::UpdateCustomerPayload,
            models::customer::CreatedCustomerResponse,
            models::customer::PasswordResetResponse,
            models::customer::MessageResponse,
        )
    ),
    tags(
        (name = "Products", description = "Tiered price lookup and catalogue administration"),
        (name = "Auth", description = "Admin and customer sign-in"),
        (name = "Customers", description = "Customer accounts (admin only)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
