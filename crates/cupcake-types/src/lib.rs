//! Common types for the Cupcake Corner order client.
//!
//! This crate holds the order model with its wire schema, the submission
//! outcome, the session events, and the schema checker used to validate
//! transport configuration tables.

/// Event types published while an order is edited and placed.
pub mod events;
/// The cupcake order, its flavors, and its JSON encoding.
pub mod order;
/// Tagged result of a submission attempt.
pub mod outcome;
/// Configuration validation types for transport implementations.
pub mod validation;

pub use events::*;
pub use order::*;
pub use outcome::*;
pub use validation::*;
