// src/services/customer_service.rs

use std::sync::Arc;

use bcrypt::hash;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerStore,
    models::{
        customer::{
            CreateCustomerPayload, CreatedCustomerResponse, Customer, CustomerUpdate,
            NewCustomer, UpdateCustomerPayload,
        },
        pricing::TierCode,
    },
};

/// Admin-side management of customer accounts.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
    bcrypt_cost: u32,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers, bcrypt_cost: bcrypt::DEFAULT_COST }
    }

    /// Lower bcrypt cost for tests.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub async fn create_account(
        &self,
        payload: CreateCustomerPayload,
    ) -> Result<CreatedCustomerResponse, AppError> {
        let username = payload.phone.trim().to_string();
        let password = temporary_password(&payload.name, &username);
        let password_hash = self.hash_password(password.clone()).await?;

        let customer = self
            .customers
            .create(NewCustomer {
                name: payload.name,
                phone: username.clone(),
                username: username.clone(),
                password_hash,
                allowed_price_types: normalize_price_types(
                    payload.allowed_price_types.unwrap_or_default(),
                ),
            })
            .await?;

        tracing::info!(%username, "Customer account created");
        Ok(CreatedCustomerResponse {
            message: "Account created".to_string(),
            username,
            password,
            customer,
        })
    }

    pub async fn list(&self) -> Result<Vec<Customer>, AppError> {
        self.customers.list().await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateCustomerPayload) -> Result<Customer, AppError> {
        let phone = payload.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        let update = CustomerUpdate {
            name: payload.name.filter(|n| !n.trim().is_empty()),
            username: phone.clone(),
            phone,
            allowed_price_types: payload.allowed_price_types.map(normalize_price_types),
        };
        self.customers.update(id, update).await?.ok_or(AppError::CustomerNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.customers.delete(id).await? {
            return Err(AppError::CustomerNotFound);
        }
        tracing::info!(%id, "Customer account deleted");
        Ok(())
    }

    /// Regenerates the temporary password and returns it in plain text.
    pub async fn reset_password(&self, id: Uuid) -> Result<String, AppError> {
        let customer = self.customers.find_by_id(id).await?.ok_or(AppError::CustomerNotFound)?;

        let password = temporary_password(&customer.name, &customer.phone);
        let password_hash = self.hash_password(password.clone()).await?;
        if !self.customers.set_password_hash(id, &password_hash).await? {
            return Err(AppError::CustomerNotFound);
        }

        tracing::info!(username = %customer.username, "Customer password reset");
        Ok(password)
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Password hashing task failed: {}", e))??;
        Ok(hashed)
    }
}

/// `<name without diacritics or whitespace, lowercased><last 3 of phone>`.
pub fn temporary_password(name: &str, phone: &str) -> String {
    let base: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    let base = if base.is_empty() { "user".to_string() } else { base };

    let phone = phone.trim();
    let chars: Vec<char> = phone.chars().collect();
    let suffix: String = if chars.is_empty() {
        "000".to_string()
    } else {
        chars[chars.len().saturating_sub(3)..].iter().collect()
    };

    format!("{base}{suffix}")
}

/// Uppercases, trims and keeps only known tier codes, without duplicates.
pub fn normalize_price_types(raw: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for entry in raw {
        if let Ok(tier) = entry.parse::<TierCode>() {
            let code = tier.as_str().to_string();
            if !normalized.contains(&code) {
                normalized.push(code);
            }
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryCustomerStore;
    use rstest::rstest;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(MemoryCustomerStore::new())).with_bcrypt_cost(4)
    }

    fn payload(name: &str, phone: &str, tiers: &[&str]) -> CreateCustomerPayload {
        CreateCustomerPayload {
            name: name.into(),
            phone: phone.into(),
            allowed_price_types: Some(tiers.iter().map(|t| t.to_string()).collect()),
        }
    }

    #[rstest]
    #[case("Nguyễn Văn An", "0901234567", "nguyenvanan567")]
    #[case("Trần Thị Bình", " 0987654321 ", "tranthibinh321")]
    #[case("   ", "0912", "user912")]
    #[case("Lê", "12", "le12")]
    #[case("Hùng", "", "hung000")]
    fn builds_temporary_passwords(#[case] name: &str, #[case] phone: &str, #[case] expected: &str) {
        assert_eq!(temporary_password(name, phone), expected);
    }

    #[test]
    fn price_types_are_normalized() {
        let raw = vec!["bl".into(), " BBPT ".into(), "gold".into(), "BL".into(), "".into()];
        assert_eq!(normalize_price_types(raw), vec!["BL".to_string(), "BBPT".to_string()]);
    }

    #[tokio::test]
    async fn create_account_uses_phone_as_username() {
        let service = service();
        let created = service.create_account(payload("Phạm Minh", " 0909000111 ", &["bl"])).await.unwrap();

        assert_eq!(created.username, "0909000111");
        assert_eq!(created.password, "phamminh111");
        assert_eq!(created.customer.allowed_price_types, vec!["BL".to_string()]);
        let hash = created.customer.password_hash.unwrap();
        assert!(bcrypt::verify("phamminh111", &hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_phone_is_a_conflict() {
        let service = service();
        service.create_account(payload("A", "0909", &[])).await.unwrap();
        assert!(matches!(
            service.create_account(payload("B", "0909", &[])).await,
            Err(AppError::AccountExists(_))
        ));
    }

    #[tokio::test]
    async fn update_phone_also_moves_the_username() {
        let service = service();
        let created = service.create_account(payload("A", "0909", &["BL"])).await.unwrap();

        let updated = service
            .update(
                created.customer.id,
                UpdateCustomerPayload {
                    phone: Some("0911".into()),
                    allowed_price_types: Some(vec!["blvip".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone, "0911");
        assert_eq!(updated.username, "0911");
        assert_eq!(updated.name, "A");
        assert_eq!(updated.allowed_price_types, vec!["BLVIP".to_string()]);
    }

    #[tokio::test]
    async fn reset_password_stores_a_new_hash() {
        let store = Arc::new(MemoryCustomerStore::new());
        let service = CustomerService::new(store.clone()).with_bcrypt_cost(4);
        let created = service.create_account(payload("Lan", "0933444555", &[])).await.unwrap();

        let password = service.reset_password(created.customer.id).await.unwrap();
        assert_eq!(password, "lan555");

        let stored = store.find_by_id(created.customer.id).await.unwrap().unwrap();
        assert!(bcrypt::verify("lan555", stored.password_hash.as_deref().unwrap()).unwrap());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let service = service();
        let id = Uuid::new_v4();
        assert!(matches!(service.delete(id).await, Err(AppError::CustomerNotFound)));
        assert!(matches!(service.reset_password(id).await, Err(AppError::CustomerNotFound)));
        assert!(matches!(
            service.update(id, UpdateCustomerPayload::default()).await,
            Err(AppError::CustomerNotFound)
        ));
    }
}
