// src/services/pagination.rs

use crate::models::pricing::PaginationMeta;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Bounded(u64),
    Unlimited,
}

/// A page request after default coercion: `page >= 1`, bounded limits `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: Limit,
}

impl PageRequest {
    /// Builds a request from raw query values. Anything that is not a
    /// positive integer (or `all` for the limit) falls back to the default.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE);

        let limit = match limit.map(str::trim) {
            Some(l) if l.eq_ignore_ascii_case("all") => Limit::Unlimited,
            Some(l) => Limit::Bounded(
                l.parse::<u64>().ok().filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
            ),
            None => Limit::Bounded(DEFAULT_LIMIT),
        };

        Self { page, limit }
    }

    /// The window this request asks for before it is clamped against the
    /// real total.
    pub fn requested_window(&self) -> PageWindow {
        match self.limit {
            Limit::Unlimited => PageWindow { skip: 0, take: None },
            Limit::Bounded(limit) => PageWindow {
                skip: (self.page - 1).saturating_mul(limit),
                take: Some(limit),
            },
        }
    }
}

/// Rows to skip and take (`None` = everything after `skip`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub take: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub window: PageWindow,
    pub meta: PaginationMeta,
}

pub fn paginate(total: u64, request: &PageRequest) -> Page {
    match request.limit {
        Limit::Unlimited => Page {
            window: PageWindow { skip: 0, take: None },
            meta: PaginationMeta {
                current_page: 1,
                total_pages: 1,
                total_products: total,
                products_per_page: total,
                has_next_page: false,
                has_prev_page: false,
            },
        },
        Limit::Bounded(limit) => {
            let limit = limit.max(1);
            let total_pages = total.div_ceil(limit).max(1);
            let current_page = request.page.clamp(1, total_pages);
            Page {
                window: PageWindow { skip: (current_page - 1) * limit, take: Some(limit) },
                meta: PaginationMeta {
                    current_page,
                    total_pages,
                    total_products: total,
                    products_per_page: limit,
                    has_next_page: current_page < total_pages,
                    has_prev_page: current_page > 1,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bounded(page: u64, limit: u64) -> PageRequest {
        PageRequest { page, limit: Limit::Bounded(limit) }
    }

    #[test]
    fn empty_catalogue_has_one_page() {
        let page = paginate(0, &bounded(1, 50));
        assert_eq!(page.meta.total_pages, 1);
        assert_eq!(page.meta.current_page, 1);
        assert!(!page.meta.has_next_page);
        assert!(!page.meta.has_prev_page);
        assert_eq!(page.window, PageWindow { skip: 0, take: Some(50) });
    }

    #[test]
    fn last_partial_page() {
        let page = paginate(101, &bounded(3, 50));
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.current_page, 3);
        assert!(!page.meta.has_next_page);
        assert!(page.meta.has_prev_page);
        assert_eq!(page.window.skip, 100);
    }

    #[test]
    fn page_past_the_end_is_clamped() {
        let page = paginate(101, &bounded(99, 50));
        assert_eq!(page.meta.current_page, 3);
        assert_eq!(page.window.skip, 100);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let page = paginate(120, &bounded(2, 50));
        assert_eq!(page.meta.current_page, 2);
        assert!(page.meta.has_next_page);
        assert!(page.meta.has_prev_page);
        assert_eq!(page.meta.products_per_page, 50);
        assert_eq!(page.window.skip, 50);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(paginate(100, &bounded(1, 50)).meta.total_pages, 2);
    }

    #[test]
    fn unlimited_returns_everything_on_one_page() {
        let page = paginate(120, &PageRequest { page: 4, limit: Limit::Unlimited });
        assert_eq!(page.window, PageWindow { skip: 0, take: None });
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.total_pages, 1);
        assert_eq!(page.meta.products_per_page, 120);
        assert!(!page.meta.has_next_page);
        assert!(!page.meta.has_prev_page);
    }

    #[rstest]
    #[case(None, None, bounded(1, 50))]
    #[case(Some("2"), Some("10"), bounded(2, 10))]
    #[case(Some("0"), Some("0"), bounded(1, 50))]
    #[case(Some("-3"), Some("-1"), bounded(1, 50))]
    #[case(Some("abc"), Some("ten"), bounded(1, 50))]
    #[case(Some("1.5"), Some("2.5"), bounded(1, 50))]
    #[case(Some(" 4 "), Some(" 20 "), bounded(4, 20))]
    #[case(Some("2"), Some("all"), PageRequest { page: 2, limit: Limit::Unlimited })]
    #[case(None, Some("ALL"), PageRequest { page: 1, limit: Limit::Unlimited })]
    fn raw_values_are_coerced(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected: PageRequest,
    ) {
        assert_eq!(PageRequest::from_raw(page, limit), expected);
    }

    #[test]
    fn requested_window_follows_the_raw_page() {
        assert_eq!(bounded(99, 50).requested_window(), PageWindow { skip: 4900, take: Some(50) });
    }
}
