//! Infrastructure layer providing external service integrations.
//!
//! This module contains the cart snapshot storage and the commerce
//! platform client that feeds the product catalog.

pub mod persistence;
pub mod storefront;
pub mod loader;

pub use persistence::*;
pub use storefront::*;
pub use loader::*;
