// src/services/product_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductStore,
    models::{
        pricing::TierCode,
        product::{CreateProductPayload, Product, ProductRecord, TierPrices, UpdateProductPayload},
    },
};

/// Catalogue administration. Every write stores prices in the nested map
/// under the uppercase tier codes.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    pub async fn list_all(&self) -> Result<Vec<ProductRecord>, AppError> {
        self.products.list_all().await
    }

    pub async fn get_by_code(&self, code: &str) -> Result<ProductRecord, AppError> {
        self.products.find_by_code(code).await?.ok_or(AppError::ProductNotFound)
    }

    pub async fn create(&self, payload: CreateProductPayload) -> Result<ProductRecord, AppError> {
        let mut prices = Map::new();
        for tier in TierCode::ALL {
            let value = payload.prices.get(tier).unwrap_or(Decimal::ZERO);
            prices.insert(tier.as_str().to_string(), decimal_to_json(value));
        }

        let product = Product {
            code: payload.code.trim().to_string(),
            name: payload.name.trim().to_string(),
            category: payload.category,
            parent_category: payload.parent_category,
            subcategory: payload.subcategory,
            unit: Some(payload.unit.trim().to_string()),
            image: payload.image,
            prices: Some(prices),
            extra: Map::new(),
        };

        let record = self.products.insert(&product).await?;
        tracing::info!(code = %record.product.code, "Product created");
        Ok(record)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateProductPayload) -> Result<ProductRecord, AppError> {
        let current = self.products.find_by_id(id).await?.ok_or(AppError::ProductNotFound)?;
        let mut product = current.product;

        if let Some(code) = payload.code {
            product.code = code.trim().to_string();
        }
        if let Some(name) = payload.name {
            product.name = name.trim().to_string();
        }
        if payload.category.is_some() {
            product.category = payload.category;
        }
        if payload.parent_category.is_some() {
            product.parent_category = payload.parent_category;
        }
        if payload.subcategory.is_some() {
            product.subcategory = payload.subcategory;
        }
        if let Some(unit) = payload.unit {
            product.unit = Some(unit.trim().to_string());
        }
        if payload.image.is_some() {
            product.image = payload.image;
        }
        merge_prices(&mut product, &payload.prices);

        let record = self.products.replace(id, &product).await?.ok_or(AppError::ProductNotFound)?;
        tracing::info!(code = %record.product.code, "Product updated");
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.products.delete(id).await? {
            return Err(AppError::ProductNotFound);
        }
        tracing::info!(%id, "Product deleted");
        Ok(())
    }

    pub async fn parent_categories(&self) -> Result<Vec<String>, AppError> {
        self.products.parent_categories().await
    }

    pub async fn subcategories(&self, parent_category: &str) -> Result<Vec<String>, AppError> {
        self.products.subcategories(parent_category).await
    }
}

/// Writes the provided tier prices into the nested map. A legacy lowercase
/// `honda247` entry is dropped once the canonical key is written, so the
/// stale value can no longer be picked up.
fn merge_prices(product: &mut Product, prices: &TierPrices) {
    let updates: Vec<(TierCode, Decimal)> =
        TierCode::ALL.into_iter().filter_map(|t| prices.get(t).map(|p| (t, p))).collect();
    if updates.is_empty() {
        return;
    }

    let map = product.prices.get_or_insert_with(Map::new);
    for (tier, price) in updates {
        map.insert(tier.as_str().to_string(), decimal_to_json(price));
        if let Some(legacy) = tier.legacy_key() {
            map.remove(legacy);
        }
    }
}

fn decimal_to_json(value: Decimal) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
