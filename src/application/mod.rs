//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the quiz flow, the cart store and the catalog view, all owned by [`App`].

pub mod quiz;
pub mod cart;
pub mod catalog;
pub mod state;

pub use quiz::*;
pub use cart::*;
pub use catalog::*;
pub use state::*;
