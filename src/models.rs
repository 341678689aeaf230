pub mod auth;
pub mod customer;
pub mod pricing;
pub mod product;
