#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use price_lookup::{
    config::AppState,
    db::memory::{MemoryCustomerStore, MemoryProductStore},
    models::{
        auth::{Claims, TokenRole},
        product::Product,
    },
    router,
    services::customer_service::CustomerService,
};

pub const JWT_SECRET: &str = "integration-secret";
pub const ADMIN_PASSWORD: &str = "admin-pass";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub products: Arc<MemoryProductStore>,
    pub customers: Arc<MemoryCustomerStore>,
}

impl TestApp {
    pub fn new(products: Vec<Product>) -> Self {
        let products = Arc::new(MemoryProductStore::with_products(products));
        let customers = Arc::new(MemoryCustomerStore::new());
        let mut state = AppState::from_parts(
            products.clone(),
            customers.clone(),
            JWT_SECRET.to_string(),
            ADMIN_PASSWORD.to_string(),
        );
        state.customer_service = CustomerService::new(customers.clone()).with_bcrypt_cost(4);

        Self { router: router(state.clone()), state, products, customers }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    /// GET with a verbatim `Authorization` header value.
    pub async fn get_with_authorization(&self, uri: &str, authorization: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub fn admin_token(&self) -> String {
        self.state.auth_service.admin_login(ADMIN_PASSWORD).unwrap().token
    }

    pub fn customer_token(&self, tiers: &[&str]) -> String {
        self.token(TokenRole::Customer, tiers, Duration::hours(1))
    }

    pub fn expired_admin_token(&self) -> String {
        self.token(TokenRole::Admin, &[], Duration::hours(-2))
    }

    fn token(&self, role: TokenRole, tiers: &[&str], ttl: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: None,
            username: Some("0900000000".into()),
            role,
            allowed_price_types: tiers.iter().map(|t| t.to_string()).collect(),
            is_authenticated: role == TokenRole::Admin,
            exp: (now + ttl).timestamp() as usize,
            iat: (now - Duration::hours(3)).timestamp() as usize,
        };
        self.state.auth_service.create_token(&claims).unwrap()
    }
}

/// `count` products `P000..`, each with nested canonical prices for every tier.
pub fn catalogue(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({
                "code": format!("P{i:03}"),
                "name": format!("Product {i}"),
                "parentCategory": if i % 3 == 0 { "Dầu nhớt" } else { "Phụ tùng" },
                "subcategory": if i % 2 == 0 { "Lọc" } else { "Bugi" },
                "unit": "cái",
                "prices": {
                    "BBCL": 1000 + i,
                    "BBPT": 2000 + i,
                    "BL": 3000 + i,
                    "BLVIP": 4000 + i,
                    "HONDA247": 5000 + i,
                },
            }))
            .unwrap()
        })
        .collect()
}
