// src/db/customer_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::customer::{Customer, CustomerUpdate, NewCustomer},
};

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError>;

    async fn list(&self) -> Result<Vec<Customer>, AppError>;

    /// Fails with `AccountExists` when the phone or username is taken.
    async fn create(&self, customer: NewCustomer) -> Result<Customer, AppError>;

    async fn update(&self, id: Uuid, update: CustomerUpdate) -> Result<Option<Customer>, AppError>;

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

const CUSTOMER_COLUMNS: &str =
    "id, name, phone, username, password_hash, allowed_price_types, created_at";

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some("customers_username_key") => "username",
                    _ => "phone",
                };
                return AppError::AccountExists(field.to_string());
            }
        }
        e.into()
    }
}

#[async_trait]
impl CustomerStore for PgCustomerRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    async fn list(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, phone, username, password_hash, allowed_price_types)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.username)
        .bind(&customer.password_hash)
        .bind(&customer.allowed_price_types)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_write_error)
    }

    async fn update(&self, id: Uuid, update: CustomerUpdate) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                username = COALESCE($4, username),
                allowed_price_types = COALESCE($5, allowed_price_types)
            WHERE id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.phone)
        .bind(update.username)
        .bind(update.allowed_price_types)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_write_error)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE customers SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
