// src/models/pricing.rs

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

// ---
// Tier codes
// ---

/// The five customer pricing classes. Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TierCode {
    Bbcl,
    Bbpt,
    Bl,
    Blvip,
    Honda247,
}

impl TierCode {
    pub const ALL: [TierCode; 5] = [
        TierCode::Bbcl,
        TierCode::Bbpt,
        TierCode::Bl,
        TierCode::Blvip,
        TierCode::Honda247,
    ];

    /// Canonical (uppercase) field name.
    pub fn as_str(self) -> &'static str {
        match self {
            TierCode::Bbcl => "BBCL",
            TierCode::Bbpt => "BBPT",
            TierCode::Bl => "BL",
            TierCode::Blvip => "BLVIP",
            TierCode::Honda247 => "HONDA247",
        }
    }

    /// Field name used by records written before the uppercase migration.
    /// Only HONDA247 was ever stored under a different spelling.
    pub fn legacy_key(self) -> Option<&'static str> {
        match self {
            TierCode::Honda247 => Some("honda247"),
            _ => None,
        }
    }
}

impl fmt::Display for TierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierCode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        TierCode::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| AppError::InvalidTier(s.to_string()))
    }
}

// ---
// Lookup query
// ---

/// Raw query string of a tiered lookup. Everything is kept as text so that
/// garbage page/limit values fall back to defaults instead of rejecting the
/// request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// 1-based page number (default 1).
    pub page: Option<String>,
    /// Page size (default 50) or `all`.
    pub limit: Option<String>,
    pub parent_category: Option<String>,
    pub subcategory: Option<String>,
}

// ---
// Lookup response
// ---

/// One product as seen through a single price tier.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceView {
    #[schema(example = "LOC-001")]
    pub code: String,
    #[schema(example = "Lọc gió")]
    pub name: String,
    pub parent_category: Option<String>,
    pub subcategory: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub image: Option<String>,
    #[schema(value_type = Option<f64>, example = 125000)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_products: u64,
    pub products_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TierLookupResponse {
    pub items: Vec<PriceView>,
    pub pagination: PaginationMeta,
}
