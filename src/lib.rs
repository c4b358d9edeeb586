//! Storefront
//!
//! Storefront is a client-side shopping cart for a small merch store: a product
//! catalog, a persistent cart, and a checkout flow that posts orders to an external
//! form endpoint.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod manager;
pub mod money;
pub mod prelude;
pub mod products;
pub mod storage;
pub mod surface;
