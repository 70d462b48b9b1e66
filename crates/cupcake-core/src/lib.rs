//! Order session core for the Cupcake Corner client.
//!
//! This crate ties the order model to a submission transport. It provides
//! the event bus the presentation layer subscribes to, the observable
//! [`OrderSession`] that owns the order for one screen lifetime, and the
//! [`SessionBuilder`] that wires a session from configuration.

pub mod builder;
pub mod event_bus;
pub mod session;

pub use builder::{BuilderError, SessionBuilder, SessionFactories};
pub use event_bus::EventBus;
pub use session::{OrderSession, SessionError};
