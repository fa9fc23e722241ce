//! Domain layer: skin types, the questionnaire, products, money and the cart.

pub mod models;
pub mod questions;
pub mod cart;
pub mod services;
pub mod errors;

pub use models::*;
pub use questions::*;
pub use cart::*;
pub use services::*;
pub use errors::*;
