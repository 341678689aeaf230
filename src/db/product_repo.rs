// src/db/product_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{Product, ProductFilter, ProductRecord},
    services::pagination::PageWindow,
};

/// Read/write access to the product catalogue.
///
/// Listings are ordered by `code` so that paging is deterministic.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, AppError>;

    async fn find_page(
        &self,
        filter: &ProductFilter,
        window: PageWindow,
    ) -> Result<Vec<Product>, AppError>;

    async fn list_all(&self) -> Result<Vec<ProductRecord>, AppError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ProductRecord>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>, AppError>;

    /// Fails with `ProductCodeExists` when the code is taken.
    async fn insert(&self, product: &Product) -> Result<ProductRecord, AppError>;

    /// Replaces the whole document. `None` when no product has this id.
    async fn replace(&self, id: Uuid, product: &Product) -> Result<Option<ProductRecord>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn parent_categories(&self) -> Result<Vec<String>, AppError>;

    async fn subcategories(&self, parent_category: &str) -> Result<Vec<String>, AppError>;
}

// ---
// PostgreSQL implementation (one JSONB document per product)
// ---

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    code: String,
    document: Json<Product>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        let mut product = row.document.0.without_row_metadata();
        // The column is the source of truth for the unique key.
        product.code = row.code;
        ProductRecord { id: row.id, product, created_at: row.created_at, updated_at: row.updated_at }
    }
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a ProductFilter) {
        builder.push(" WHERE TRUE");
        if let Some(parent) = &filter.parent_category {
            builder.push(" AND document->>'parentCategory' = ").push_bind(parent);
        }
        if let Some(sub) = &filter.subcategory {
            builder.push(" AND document->>'subcategory' = ").push_bind(sub);
        }
    }

    fn map_write_error(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::ProductCodeExists;
            }
        }
        e.into()
    }
}

#[async_trait]
impl ProductStore for PgProductRepository {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM products");
        Self::push_filter(&mut builder, filter);

        let total = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        window: PageWindow,
    ) -> Result<Vec<Product>, AppError> {
        let mut builder = QueryBuilder::new(
            "SELECT id, code, document, created_at, updated_at FROM products",
        );
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY code ASC");
        if let Some(take) = window.take {
            builder.push(" LIMIT ").push_bind(i64::try_from(take).unwrap_or(i64::MAX));
        }
        builder.push(" OFFSET ").push_bind(i64::try_from(window.skip).unwrap_or(i64::MAX));

        let rows = builder.build_query_as::<ProductRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|row| ProductRecord::from(row).product).collect())
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, code, document, created_at, updated_at FROM products ORDER BY code ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ProductRecord>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, code, document, created_at, updated_at FROM products WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ProductRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, code, document, created_at, updated_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ProductRecord::from))
    }

    async fn insert(&self, product: &Product) -> Result<ProductRecord, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (code, document)
            VALUES ($1, $2)
            RETURNING id, code, document, created_at, updated_at
            "#,
        )
        .bind(&product.code)
        .bind(Json(product))
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_write_error)?;
        Ok(row.into())
    }

    async fn replace(&self, id: Uuid, product: &Product) -> Result<Option<ProductRecord>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET code = $2, document = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, document, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&product.code)
        .bind(Json(product))
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_write_error)?;
        Ok(row.map(ProductRecord::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn parent_categories(&self) -> Result<Vec<String>, AppError> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT document->>'parentCategory' AS parent
            FROM products
            WHERE COALESCE(document->>'parentCategory', '') <> ''
            ORDER BY parent ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn subcategories(&self, parent_category: &str) -> Result<Vec<String>, AppError> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT document->>'subcategory' AS sub
            FROM products
            WHERE document->>'parentCategory' = $1
              AND COALESCE(document->>'subcategory', '') <> ''
            ORDER BY sub ASC
            "#,
        )
        .bind(parent_category)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}
