pub mod access_policy;
pub mod auth;
pub mod customer_service;
pub mod lookup_service;
pub mod pagination;
pub mod price_resolver;
pub mod product_service;
