// src/services/access_policy.rs

use crate::{
    common::error::AppError,
    models::{auth::Principal, pricing::TierCode},
};

/// Decides whether `principal` may read prices of `tier`.
///
/// Anonymous callers are allowed: the catalogue is a public storefront and
/// entitlements only narrow what a signed-in customer may see.
pub fn authorize(tier: TierCode, principal: &Principal) -> Result<(), AppError> {
    match principal {
        Principal::Admin => Ok(()),
        Principal::Anonymous => Ok(()),
        Principal::Customer { .. } if principal.is_entitled_to(tier) => Ok(()),
        Principal::Customer { username, .. } => {
            tracing::info!(tier = %tier, username = ?username, "Customer not entitled to tier");
            Err(AppError::TierNotEntitled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn customer(tiers: &[&str]) -> Principal {
        Principal::Customer {
            username: Some("0901234567".into()),
            entitled: tiers.iter().map(|t| t.to_uppercase()).collect(),
        }
    }

    #[test]
    fn admin_passes_every_tier() {
        for tier in TierCode::ALL {
            assert!(authorize(tier, &Principal::Admin).is_ok());
        }
    }

    #[test]
    fn anonymous_passes_every_tier() {
        for tier in TierCode::ALL {
            assert!(authorize(tier, &Principal::Anonymous).is_ok());
        }
    }

    #[rstest]
    #[case(&["BL"], TierCode::Bl, true)]
    #[case(&["bl"], TierCode::Bl, true)]
    #[case(&["BL"], TierCode::Bbcl, false)]
    #[case(&["bl"], TierCode::Bbcl, false)]
    #[case(&["honda247", "BBPT"], TierCode::Honda247, true)]
    #[case(&[], TierCode::Blvip, false)]
    #[case(&["VIP", "garbage"], TierCode::Blvip, false)]
    fn customer_needs_entitlement(
        #[case] tiers: &[&str],
        #[case] tier: TierCode,
        #[case] allowed: bool,
    ) {
        let result = authorize(tier, &customer(tiers));
        assert_eq!(result.is_ok(), allowed);
        if !allowed {
            assert!(matches!(result, Err(AppError::TierNotEntitled)));
        }
    }

    #[test]
    fn customer_without_username_is_still_checked() {
        let principal = Principal::Customer {
            username: None,
            entitled: HashSet::from(["BBPT".to_string()]),
        };
        assert!(authorize(TierCode::Bbpt, &principal).is_ok());
        assert!(authorize(TierCode::Bl, &principal).is_err());
    }
}
