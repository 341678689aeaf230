// src/models/auth.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::pricing::TierCode;

// ---
// Principal: who is calling
// ---

/// The verified identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No credential, or one that failed verification.
    Anonymous,
    Admin,
    /// Entitlements are uppercased; entries that are not tier codes are kept
    /// verbatim and simply never match.
    Customer { username: Option<String>, entitled: HashSet<String> },
}

impl Principal {
    pub fn is_entitled_to(&self, tier: TierCode) -> bool {
        match self {
            Principal::Admin => true,
            Principal::Customer { entitled, .. } => entitled.contains(tier.as_str()),
            Principal::Anonymous => false,
        }
    }
}

// ---
// JWT claims
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    Admin,
    Customer,
}

/// Claims carried inside issued tokens. Admin tokens also set
/// `isAuthenticated` for older clients that only check that flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub role: TokenRole,
    #[serde(default)]
    pub allowed_price_types: Vec<String>,
    #[serde(default)]
    pub is_authenticated: bool,
    pub exp: usize,
    pub iat: usize,
}

// ---
// Payloads and responses
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminLoginPayload {
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerLoginPayload {
    #[validate(length(min = 1, message = "Username is required."))]
    #[schema(example = "0901234567")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_price_types: Option<Vec<String>>,
}
