//! Typed query modules for the collection SDK.
//!
//! Each module provides a query struct that borrows an [`ApiClient`](crate::client::ApiClient)
//! together with an authenticated token, unwraps the backend's `data` envelope,
//! and returns typed models from [`crate::models`].

pub mod catalog;
pub mod collection;

pub use catalog::{CardFilter, CatalogQuery};
pub use collection::CollectionQuery;
