//! Remote catalog access
//!
//! The catalog owns every entity and all resume state. This module exposes it
//! as the `Catalog` trait with one HTTP implementation.

mod client;
mod traits;

pub use client::{build_http_client, CatalogClient};
pub use traits::Catalog;
