//! Event types for the order session.
//!
//! Events flow through the session's event bus so the presentation layer can
//! re-render after each field change and react to submission progress.

use serde::{Deserialize, Serialize};

/// Main event type published by an order session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
	/// A field of the order was written.
	Order(OrderEvent),
	/// Submission progress.
	Submission(SubmissionEvent),
}

/// Identifies the order field touched by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderField {
	CakeType,
	Quantity,
	SpecialRequest,
	ExtraFrosting,
	AddSprinkles,
	Name,
	StreetAddress,
	City,
	Zip,
}

/// Events related to editing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A field was set. Fired on every write, including writes of an equal value.
	Changed { field: OrderField },
}

/// Events related to placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
	/// A request is about to be sent.
	Started,
	/// The endpoint accepted the order.
	Succeeded { message: String },
	/// The attempt ended without a usable confirmation.
	Failed { reason: String },
}
