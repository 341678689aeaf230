// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CustomerStore, PgCustomerRepository, PgProductRepository, ProductStore},
    services::{
        auth::AuthService, customer_service::CustomerService, lookup_service::LookupService,
        product_service::ProductService,
    },
};

/// Process configuration, read from the environment (a `.env` file is
/// loaded first when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub admin_password: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let admin_password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().with_context(|| format!("PORT is not a valid port: {raw}"))?,
            Err(_) => 5000,
        };
        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            Err(_) => 5,
        };

        Ok(Self { database_url, database_max_connections, jwt_secret, admin_password, host, port })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub lookup_service: LookupService,
    pub product_service: ProductService,
    pub customer_service: CustomerService,
}

impl AppState {
    /// Connects to PostgreSQL and wires the services over it. The pool is
    /// returned as well so the caller can run migrations.
    pub async fn new(config: &Config) -> anyhow::Result<(Self, PgPool)> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Failed to connect to the database")?;

        tracing::info!("Database connection established");

        let state = Self::from_parts(
            Arc::new(PgProductRepository::new(db_pool.clone())),
            Arc::new(PgCustomerRepository::new(db_pool.clone())),
            config.jwt_secret.clone(),
            config.admin_password.clone(),
        );
        Ok((state, db_pool))
    }

    /// Builds the dependency graph over any store implementation.
    pub fn from_parts(
        products: Arc<dyn ProductStore>,
        customers: Arc<dyn CustomerStore>,
        jwt_secret: String,
        admin_password: String,
    ) -> Self {
        let auth_service = AuthService::new(customers.clone(), jwt_secret, admin_password);
        Self {
            lookup_service: LookupService::new(products.clone(), auth_service.clone()),
            product_service: ProductService::new(products),
            customer_service: CustomerService::new(customers),
            auth_service,
        }
    }
}
