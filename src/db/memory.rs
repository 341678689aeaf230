// src/db/memory.rs

//! In-memory stores with the same contracts as the PostgreSQL repositories.
//! Used by the test suites to drive the service without a database.

use std::{collections::BTreeSet, sync::RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerStore, ProductStore},
    models::{
        customer::{Customer, CustomerUpdate, NewCustomer},
        product::{Product, ProductFilter, ProductRecord},
    },
    services::pagination::PageWindow,
};

#[derive(Default)]
pub struct MemoryProductStore {
    records: RwLock<Vec<ProductRecord>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, keeping records ordered by code like the SQL store.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let now = Utc::now();
        let mut records: Vec<ProductRecord> = products
            .into_iter()
            .map(|product| ProductRecord {
                id: Uuid::new_v4(),
                product: product.without_row_metadata(),
                created_at: now,
                updated_at: now,
            })
            .collect();
        records.sort_by(|a, b| a.product.code.cmp(&b.product.code));
        Self { records: RwLock::new(records) }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<ProductRecord>> {
        self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<ProductRecord>> {
        self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn count(&self, filter: &ProductFilter) -> Result<u64, AppError> {
        Ok(self.read().iter().filter(|r| filter.matches(&r.product)).count() as u64)
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        window: PageWindow,
    ) -> Result<Vec<Product>, AppError> {
        let records = self.read();
        let matching = records
            .iter()
            .filter(|r| filter.matches(&r.product))
            .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
            .map(|r| r.product.clone());
        Ok(match window.take {
            Some(take) => matching.take(usize::try_from(take).unwrap_or(usize::MAX)).collect(),
            None => matching.collect(),
        })
    }

    async fn list_all(&self) -> Result<Vec<ProductRecord>, AppError> {
        Ok(self.read().clone())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ProductRecord>, AppError> {
        Ok(self.read().iter().find(|r| r.product.code == code).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>, AppError> {
        Ok(self.read().iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, product: &Product) -> Result<ProductRecord, AppError> {
        let mut records = self.write();
        if records.iter().any(|r| r.product.code == product.code) {
            return Err(AppError::ProductCodeExists);
        }
        let now = Utc::now();
        let record =
            ProductRecord {
            id: Uuid::new_v4(),
            product: product.clone().without_row_metadata(),
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        records.sort_by(|a, b| a.product.code.cmp(&b.product.code));
        Ok(record)
    }

    async fn replace(&self, id: Uuid, product: &Product) -> Result<Option<ProductRecord>, AppError> {
        let mut records = self.write();
        if records.iter().any(|r| r.id != id && r.product.code == product.code) {
            return Err(AppError::ProductCodeExists);
        }
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.product = product.clone().without_row_metadata();
        record.updated_at = Utc::now();
        let updated = record.clone();
        records.sort_by(|a, b| a.product.code.cmp(&b.product.code));
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.write();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    async fn parent_categories(&self) -> Result<Vec<String>, AppError> {
        let set: BTreeSet<String> = self
            .read()
            .iter()
            .filter_map(|r| r.product.parent_category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        Ok(set.into_iter().collect())
    }

    async fn subcategories(&self, parent_category: &str) -> Result<Vec<String>, AppError> {
        let set: BTreeSet<String> = self
            .read()
            .iter()
            .filter(|r| r.product.parent_category.as_deref() == Some(parent_category))
            .filter_map(|r| r.product.subcategory.clone())
            .filter(|c| !c.is_empty())
            .collect();
        Ok(set.into_iter().collect())
    }
}

#[derive(Default)]
pub struct MemoryCustomerStore {
    customers: RwLock<Vec<Customer>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Customer>> {
        self.customers.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Customer>> {
        self.customers.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AppError> {
        Ok(self.read().iter().find(|c| c.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        Ok(self.read().iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.read().iter().rev().cloned().collect())
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, AppError> {
        let mut customers = self.write();
        if customers.iter().any(|c| c.phone == customer.phone) {
            return Err(AppError::AccountExists("phone".into()));
        }
        if customers.iter().any(|c| c.username == customer.username) {
            return Err(AppError::AccountExists("username".into()));
        }
        let created = Customer {
            id: Uuid::new_v4(),
            name: customer.name,
            phone: customer.phone,
            username: customer.username,
            password_hash: Some(customer.password_hash),
            allowed_price_types: customer.allowed_price_types,
            created_at: Utc::now(),
        };
        customers.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, update: CustomerUpdate) -> Result<Option<Customer>, AppError> {
        let mut customers = self.write();
        if let Some(phone) = &update.phone {
            if customers.iter().any(|c| c.id != id && &c.phone == phone) {
                return Err(AppError::AccountExists("phone".into()));
            }
        }
        let Some(customer) = customers.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            customer.name = name;
        }
        if let Some(phone) = update.phone {
            customer.phone = phone;
        }
        if let Some(username) = update.username {
            customer.username = username;
        }
        if let Some(tiers) = update.allowed_price_types {
            customer.allowed_price_types = tiers;
        }
        Ok(Some(customer.clone()))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError> {
        let mut customers = self.write();
        match customers.iter_mut().find(|c| c.id == id) {
            Some(customer) => {
                customer.password_hash = Some(password_hash.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut customers = self.write();
        let before = customers.len();
        customers.retain(|c| c.id != id);
        Ok(customers.len() != before)
    }
}
