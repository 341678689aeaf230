// src/services/lookup_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::ProductStore,
    models::{
        pricing::{LookupQuery, PriceView, TierCode, TierLookupResponse},
        product::{Product, ProductFilter},
    },
    services::{
        access_policy::authorize,
        auth::AuthService,
        pagination::{paginate, PageRequest},
        price_resolver::resolve_price,
    },
};

/// Serves tiered price lists: verify, authorize, fetch, resolve, paginate.
#[derive(Clone)]
pub struct LookupService {
    products: Arc<dyn ProductStore>,
    auth_service: AuthService,
}

impl LookupService {
    pub fn new(products: Arc<dyn ProductStore>, auth_service: AuthService) -> Self {
        Self { products, auth_service }
    }

    pub async fn lookup(
        &self,
        raw_tier: &str,
        credential: Option<&str>,
        query: &LookupQuery,
    ) -> Result<TierLookupResponse, AppError> {
        // 1. Validation happens before anything touches the store.
        let tier: TierCode = raw_tier.parse()?;
        let page_request = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());
        let filter = ProductFilter {
            parent_category: non_empty(query.parent_category.as_deref()),
            subcategory: non_empty(query.subcategory.as_deref()),
        };

        // 2. Who is asking, and may they see this tier?
        let principal = self.auth_service.verify(credential);
        authorize(tier, &principal)?;

        // 3. Count and slice are independent reads.
        let requested = page_request.requested_window();
        let (total, mut products) = tokio::try_join!(
            self.products.count(&filter),
            self.products.find_page(&filter, requested),
        )?;

        let page = paginate(total, &page_request);
        if page.window != requested {
            // Requested page was past the end; re-read the last real page.
            products = self.products.find_page(&filter, page.window).await?;
        }

        tracing::debug!(
            tier = %tier,
            total,
            page = page.meta.current_page,
            returned = products.len(),
            "Tier lookup served"
        );

        Ok(TierLookupResponse {
            items: products.into_iter().map(|p| price_view(p, tier)).collect(),
            pagination: page.meta,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn price_view(product: Product, tier: TierCode) -> PriceView {
    let price = resolve_price(&product, tier);
    PriceView {
        code: product.code,
        name: product.name,
        parent_category: product.parent_category,
        subcategory: product.subcategory,
        category: product.category,
        unit: product.unit,
        image: product.image,
        price,
    }
}
