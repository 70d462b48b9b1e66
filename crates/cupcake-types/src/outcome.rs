//! Result of a single order submission.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged result of one submission attempt.
///
/// Only [`Outcome::Success`] is meant for the customer. The failure variants
/// carry diagnostics for logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
	/// The endpoint echoed back a well-formed order.
	Success { message: String },
	/// No response body could be obtained.
	TransportFailure { detail: String },
	/// A body arrived but did not match the wire schema.
	DecodeFailure { raw_body: String },
}

impl Outcome {
	/// Returns true for [`Outcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Outcome::Success { .. })
	}

	/// Returns the confirmation text if the submission succeeded.
	pub fn message(&self) -> Option<&str> {
		match self {
			Outcome::Success { message } => Some(message),
			_ => None,
		}
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Outcome::Success { message } => write!(f, "{}", message),
			Outcome::TransportFailure { detail } => write!(f, "No data in response: {}", detail),
			Outcome::DecodeFailure { raw_body } => write!(f, "Invalid response: {}", raw_body),
		}
	}
}
