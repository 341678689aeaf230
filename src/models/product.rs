// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::validation::validate_not_blank, models::pricing::TierCode};

/// A product document exactly as it is stored. Records written by different
/// generations of the admin tooling disagree on where prices live, so the
/// nested `prices` map is kept untyped and any unknown top-level field
/// (legacy `BBCL`, `honda247`, ...) lands in `extra`.
///
/// Descriptive fields are read leniently: a null or mistyped value in one
/// stored document must not make the whole listing fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_required_text")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_required_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub prices: Option<Map<String, Value>>,
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

/// Top-level keys that belong to the row, not the document. Documents
/// imported from the previous database still carry them.
const ROW_METADATA_KEYS: [&str; 5] = ["id", "_id", "createdAt", "updatedAt", "__v"];

impl Product {
    pub fn without_row_metadata(mut self) -> Self {
        for key in ROW_METADATA_KEYS {
            self.extra.remove(key);
        }
        self
    }
}

/// Strings as-is, numbers and booleans in their string form, anything else
/// (null, arrays, objects) absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

/// A stored product together with its row metadata.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub product: Product,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Narrows the candidate set of a listing. Both the count and the page
/// slice of one lookup use the same filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub parent_category: Option<String>,
    pub subcategory: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let parent_ok = self
            .parent_category
            .as_deref()
            .is_none_or(|p| product.parent_category.as_deref() == Some(p));
        let sub_ok = self
            .subcategory
            .as_deref()
            .is_none_or(|s| product.subcategory.as_deref() == Some(s));
        parent_ok && sub_ok
    }
}

// ---
// Admin payloads
// ---

/// Body of `POST /api/products`. Tier prices arrive as flat fields and are
/// stored in the nested map; missing ones default to 0.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "LOC-001")]
    pub code: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    pub category: Option<String>,
    pub parent_category: Option<String>,
    pub subcategory: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub unit: String,
    pub image: Option<String>,
    #[serde(flatten)]
    pub prices: TierPrices,
}

/// Body of `PUT /api/products/{id}`: only the provided fields change.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub code: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub parent_category: Option<String>,
    pub subcategory: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub unit: Option<String>,
    pub image: Option<String>,
    #[serde(flatten)]
    pub prices: TierPrices,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct TierPrices {
    #[serde(rename = "BBCL")]
    #[schema(value_type = Option<f64>)]
    pub bbcl: Option<Decimal>,
    #[serde(rename = "BBPT")]
    #[schema(value_type = Option<f64>)]
    pub bbpt: Option<Decimal>,
    #[serde(rename = "BL")]
    #[schema(value_type = Option<f64>)]
    pub bl: Option<Decimal>,
    #[serde(rename = "BLVIP")]
    #[schema(value_type = Option<f64>)]
    pub blvip: Option<Decimal>,
    #[serde(rename = "HONDA247")]
    #[schema(value_type = Option<f64>)]
    pub honda247: Option<Decimal>,
}

impl TierPrices {
    pub fn get(&self, tier: TierCode) -> Option<Decimal> {
        match tier {
            TierCode::Bbcl => self.bbcl,
            TierCode::Bbpt => self.bbpt,
            TierCode::Bl => self.bl,
            TierCode::Blvip => self.blvip,
            TierCode::Honda247 => self.honda247,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductMessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryList {
    pub categories: Vec<String>,
}
