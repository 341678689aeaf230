// src/services/price_resolver.rs

use std::str::FromStr;

use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde_json::Value;

use crate::models::{pricing::TierCode, product::Product};

/// A place where a tier price may be stored on a product document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceLocation {
    /// `prices.<TIER>`
    NestedCanonical,
    /// `prices.honda247`
    NestedLegacy,
    /// `<TIER>` at the document root
    TopLevelCanonical,
    /// `honda247` at the document root
    TopLevelLegacy,
}

/// Locations in precedence order. The first one holding a non-null value is
/// authoritative; the rest are never consulted.
pub const PRICE_LOCATIONS: [PriceLocation; 4] = [
    PriceLocation::NestedCanonical,
    PriceLocation::NestedLegacy,
    PriceLocation::TopLevelCanonical,
    PriceLocation::TopLevelLegacy,
];

impl PriceLocation {
    pub fn extract<'a>(self, product: &'a Product, tier: TierCode) -> Option<&'a Value> {
        let value = match self {
            PriceLocation::NestedCanonical => product.prices.as_ref()?.get(tier.as_str()),
            PriceLocation::NestedLegacy => product.prices.as_ref()?.get(tier.legacy_key()?),
            PriceLocation::TopLevelCanonical => product.extra.get(tier.as_str()),
            PriceLocation::TopLevelLegacy => product.extra.get(tier.legacy_key()?),
        };
        value.filter(|v| !v.is_null())
    }
}

/// Resolves the price of `product` for `tier`, or `None` when no location
/// holds one.
pub fn resolve_price(product: &Product, tier: TierCode) -> Option<Decimal> {
    let (location, raw) = PRICE_LOCATIONS
        .iter()
        .find_map(|location| location.extract(product, tier).map(|v| (*location, v)))?;

    let price = to_decimal(raw);
    if price.is_none() {
        tracing::debug!(
            code = %product.code,
            tier = %tier,
            ?location,
            "Price value is not numeric, reporting it as missing"
        );
    }
    price
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_u64().map(Decimal::from))
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn product(doc: Value) -> Product {
        serde_json::from_value(doc).unwrap()
    }

    #[rstest]
    #[case(TierCode::Bbcl)]
    #[case(TierCode::Bbpt)]
    #[case(TierCode::Bl)]
    #[case(TierCode::Blvip)]
    #[case(TierCode::Honda247)]
    fn nested_canonical_key_wins_over_top_level(#[case] tier: TierCode) {
        let key = tier.as_str();
        let p = product(json!({
            "code": "P1",
            "prices": { key: 100 },
            key: 999,
            "honda247": 888,
        }));

        assert_eq!(resolve_price(&p, tier), Some(Decimal::from(100)));
    }

    #[test]
    fn nested_legacy_key_is_used_for_honda247() {
        let p = product(json!({
            "code": "P1",
            "prices": { "honda247": 250, "BL": 1 },
            "HONDA247": 999,
        }));

        assert_eq!(resolve_price(&p, TierCode::Honda247), Some(Decimal::from(250)));
    }

    #[test]
    fn nested_legacy_key_is_ignored_for_other_tiers() {
        let p = product(json!({ "code": "P1", "prices": { "honda247": 250 } }));
        assert_eq!(resolve_price(&p, TierCode::Bl), None);
    }

    #[test]
    fn top_level_canonical_field_is_the_third_choice() {
        let p = product(json!({
            "code": "P1",
            "prices": { "BL": 5 },
            "HONDA247": 300,
            "honda247": 1,
        }));

        assert_eq!(resolve_price(&p, TierCode::Honda247), Some(Decimal::from(300)));
    }

    #[test]
    fn top_level_lowercase_honda247_is_the_last_resort() {
        let p = product(json!({ "code": "P1", "honda247": 410 }));
        assert_eq!(resolve_price(&p, TierCode::Honda247), Some(Decimal::from(410)));
    }

    #[test]
    fn null_entries_fall_through_to_the_next_location() {
        let p = product(json!({
            "code": "P1",
            "prices": { "HONDA247": null, "honda247": null },
            "HONDA247": null,
            "honda247": 7,
        }));

        assert_eq!(resolve_price(&p, TierCode::Honda247), Some(Decimal::from(7)));
    }

    #[rstest]
    #[case(TierCode::Bbcl)]
    #[case(TierCode::Honda247)]
    fn missing_everywhere_resolves_to_none(#[case] tier: TierCode) {
        let p = product(json!({ "code": "P1", "name": "x", "prices": {} }));
        assert_eq!(resolve_price(&p, tier), None);
    }

    #[test]
    fn fractional_and_string_prices_are_accepted() {
        let p = product(json!({
            "code": "P1",
            "prices": { "BL": 12.5, "BBCL": " 4000 " },
        }));

        assert_eq!(resolve_price(&p, TierCode::Bl), Some(Decimal::new(125, 1)));
        assert_eq!(resolve_price(&p, TierCode::Bbcl), Some(Decimal::from(4000)));
    }

    #[test]
    fn non_numeric_winner_does_not_fall_back() {
        let p = product(json!({
            "code": "P1",
            "prices": { "BL": "call us" },
            "BL": 10,
        }));

        assert_eq!(resolve_price(&p, TierCode::Bl), None);
    }
}
