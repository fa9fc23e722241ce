//! skinshop - skin-type quiz and storefront in the terminal
//!
//! A short questionnaire works out the visitor's skin type, then a product
//! listing from a Shopify storefront is shown for that type. The cart is
//! kept on disk between sessions.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod cli;
pub mod logging;
