// src/services/auth.rs

use std::{collections::HashSet, sync::Arc};

use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::CustomerStore,
    models::auth::{AuthResponse, Claims, Principal, TokenRole},
};

const ADMIN_TOKEN_HOURS: i64 = 24;
const CUSTOMER_TOKEN_HOURS: i64 = 12;

/// Issues and verifies bearer tokens, and runs the two login flows.
#[derive(Clone)]
pub struct AuthService {
    customers: Arc<dyn CustomerStore>,
    jwt_secret: String,
    admin_password: String,
}

impl AuthService {
    pub fn new(customers: Arc<dyn CustomerStore>, jwt_secret: String, admin_password: String) -> Self {
        Self { customers, jwt_secret, admin_password }
    }

    // ---
    // Credential verification
    // ---

    /// Lenient verification used by public reads: a missing credential and a
    /// credential that fails verification both come back as `Anonymous`.
    pub fn verify(&self, raw: Option<&str>) -> Principal {
        let Some(token) = raw else {
            return Principal::Anonymous;
        };
        match self.decode_principal(token) {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!("Bearer token rejected, continuing as anonymous: {}", e);
                Principal::Anonymous
            }
        }
    }

    /// Strict verification used by protected routes.
    pub fn decode_principal(&self, token: &str) -> Result<Principal, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        Ok(match claims.role {
            TokenRole::Admin => Principal::Admin,
            TokenRole::Customer => Principal::Customer {
                username: claims.username,
                entitled: claims
                    .allowed_price_types
                    .iter()
                    .map(|t| t.trim().to_uppercase())
                    .collect::<HashSet<_>>(),
            },
        })
    }

    // ---
    // Login flows
    // ---

    pub fn admin_login(&self, password: &str) -> Result<AuthResponse, AppError> {
        if password != self.admin_password {
            return Err(AppError::InvalidCredentials);
        }
        let claims = Claims {
            is_authenticated: true,
            ..self.claims(TokenRole::Admin, ADMIN_TOKEN_HOURS)
        };
        tracing::info!("Admin signed in");
        Ok(AuthResponse { token: self.create_token(&claims)?, allowed_price_types: None })
    }

    pub async fn customer_login(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let customer = self
            .customers
            .find_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let hash_clone = customer.password_hash.clone().unwrap_or_default();

        // bcrypt is CPU bound; keep it off the async workers.
        let is_password_valid = tokio::task::spawn_blocking(move || {
            if hash_clone.is_empty() {
                return Ok(false);
            }
            verify(&password_clone, &hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let allowed: Vec<String> =
            customer.allowed_price_types.iter().map(|t| t.to_uppercase()).collect();

        let claims = Claims {
            sub: Some(customer.id.to_string()),
            username: Some(customer.username.clone()),
            allowed_price_types: allowed.clone(),
            ..self.claims(TokenRole::Customer, CUSTOMER_TOKEN_HOURS)
        };

        tracing::info!(username = %customer.username, "Customer signed in");
        Ok(AuthResponse { token: self.create_token(&claims)?, allowed_price_types: Some(allowed) })
    }

    fn claims(&self, role: TokenRole, ttl_hours: i64) -> Claims {
        let now = Utc::now();
        let expires_at = now + Duration::hours(ttl_hours);
        Claims {
            sub: None,
            username: None,
            role,
            allowed_price_types: Vec::new(),
            is_authenticated: false,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        }
    }

    pub fn create_token(&self, claims: &Claims) -> Result<String, AppError> {
        Ok(encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryCustomerStore,
        models::customer::NewCustomer,
    };

    fn service_with(store: MemoryCustomerStore) -> AuthService {
        AuthService::new(Arc::new(store), "test-secret".into(), "admin123".into())
    }

    fn service() -> AuthService {
        service_with(MemoryCustomerStore::new())
    }

    async fn store_with_customer(password: &str, tiers: &[&str]) -> MemoryCustomerStore {
        let store = MemoryCustomerStore::new();
        store
            .create(NewCustomer {
                name: "An".into(),
                phone: "0901234567".into(),
                username: "0901234567".into(),
                password_hash: bcrypt::hash(password, 4).unwrap(),
                allowed_price_types: tiers.iter().map(|t| t.to_string()).collect(),
            })
            .await
            .unwrap();
        store
    }

    #[test]
    fn missing_credential_is_anonymous() {
        assert_eq!(service().verify(None), Principal::Anonymous);
    }

    #[test]
    fn garbage_credential_is_anonymous() {
        assert_eq!(service().verify(Some("not-a-jwt")), Principal::Anonymous);
    }

    #[test]
    fn admin_login_round_trips_to_admin_principal() {
        let service = service();
        let response = service.admin_login("admin123").unwrap();
        assert_eq!(service.verify(Some(&response.token)), Principal::Admin);
    }

    #[test]
    fn wrong_admin_password_is_rejected() {
        assert!(matches!(
            service().admin_login("nope"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn expired_token_is_anonymous() {
        let service = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            exp: (now - 3600) as usize,
            iat: (now - 7200) as usize,
            ..service.claims(TokenRole::Admin, 1)
        };
        let token = service.create_token(&claims).unwrap();

        assert_eq!(service.verify(Some(&token)), Principal::Anonymous);
        assert!(matches!(service.decode_principal(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn token_signed_with_another_secret_is_anonymous() {
        let other = AuthService::new(Arc::new(MemoryCustomerStore::new()), "other".into(), "x".into());
        let token = other.admin_login("x").unwrap().token;
        assert_eq!(service().verify(Some(&token)), Principal::Anonymous);
    }

    #[test]
    fn customer_entitlements_are_uppercased() {
        let service = service();
        let claims = Claims {
            username: Some("0901".into()),
            allowed_price_types: vec!["bl".into(), " honda247 ".into(), "???".into()],
            ..service.claims(TokenRole::Customer, 1)
        };
        let token = service.create_token(&claims).unwrap();

        let Principal::Customer { username, entitled } = service.verify(Some(&token)) else {
            panic!("expected a customer principal");
        };
        assert_eq!(username.as_deref(), Some("0901"));
        assert_eq!(entitled, HashSet::from(["BL".into(), "HONDA247".into(), "???".into()]));
    }

    #[tokio::test]
    async fn customer_login_issues_entitled_token() {
        let service = service_with(store_with_customer("an567", &["bl", "BBPT"]).await);

        let response = service.customer_login("0901234567", "an567").await.unwrap();
        assert_eq!(response.allowed_price_types, Some(vec!["BL".to_string(), "BBPT".to_string()]));

        let principal = service.verify(Some(&response.token));
        assert!(principal.is_entitled_to(crate::models::pricing::TierCode::Bl));
        assert!(!principal.is_entitled_to(crate::models::pricing::TierCode::Bbcl));
    }

    #[tokio::test]
    async fn customer_login_rejects_bad_password_and_unknown_user() {
        let service = service_with(store_with_customer("an567", &["BL"]).await);

        assert!(matches!(
            service.customer_login("0901234567", "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            service.customer_login("0000000000", "an567").await,
            Err(AppError::InvalidCredentials)
        ));
    }
}
