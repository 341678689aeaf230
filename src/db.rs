pub mod product_repo;
pub use product_repo::{PgProductRepository, ProductStore};
pub mod customer_repo;
pub use customer_repo::{CustomerStore, PgCustomerRepository};
pub mod memory;
