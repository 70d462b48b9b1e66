//! Order submission for the Cupcake Corner client.
//!
//! This crate sends an encoded order to the order endpoint and turns whatever
//! comes back into an [`Outcome`]. The transport is pluggable: the
//! [`SubmissionInterface`] trait is implemented by an HTTP client for real
//! use and by an in-process echo for offline runs.

use async_trait::async_trait;
use cupcake_types::{ConfigSchema, Order, Outcome};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod echo;
	pub mod http;
}

/// Errors that can occur while talking to the order endpoint.
#[derive(Debug, Error)]
pub enum SubmissionError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a transport is configured incorrectly.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Raw reply from the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
	/// HTTP status code, or a synthetic one for in-process transports.
	pub status: u16,
	/// Response body, possibly empty.
	pub body: Vec<u8>,
}

/// Trait defining the interface for order transports.
///
/// A transport delivers one encoded order and hands back whatever the
/// endpoint replied. It does not interpret the reply.
#[async_trait]
pub trait SubmissionInterface: Send + Sync {
	/// Returns the configuration schema for this transport.
	///
	/// The schema is checked against the transport's TOML table before the
	/// transport is built.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Sends an encoded order as a JSON POST.
	///
	/// Makes exactly one attempt. Returns an error only when no response
	/// could be obtained at all.
	async fn send(&self, body: Vec<u8>) -> Result<TransportResponse, SubmissionError>;
}

/// Places orders through a single transport.
pub struct SubmissionService {
	transport: Box<dyn SubmissionInterface>,
}

impl SubmissionService {
	pub fn new(transport: Box<dyn SubmissionInterface>) -> Self {
		Self { transport }
	}

	/// Submits an order and interprets the endpoint's reply.
	///
	/// The order is encoded and sent exactly once. The reply maps to an
	/// outcome as follows:
	/// - no reply or an empty body gives [`Outcome::TransportFailure`]
	/// - a body that does not decode gives [`Outcome::DecodeFailure`]
	/// - a decodable body gives [`Outcome::Success`], with the message built
	///   from the decoded order rather than the one sent
	///
	/// Nothing is retried and repeated calls are not deduplicated.
	pub async fn submit_order(&self, order: &Order) -> Outcome {
		let body = match order.encode() {
			Ok(body) => body,
			Err(e) => {
				tracing::error!(component = "submission", error = %e, "Failed to encode order");
				return Outcome::TransportFailure {
					detail: "Failed to encode order".to_string(),
				};
			},
		};

		tracing::debug!(
			component = "submission",
			bytes = body.len(),
			cake_type = %order.cake_type,
			quantity = order.quantity,
			"Sending order"
		);

		let response = match self.transport.send(body).await {
			Ok(response) => response,
			Err(e) => {
				tracing::warn!(component = "submission", error = %e, "No data in response");
				return Outcome::TransportFailure {
					detail: e.to_string(),
				};
			},
		};

		if response.body.is_empty() {
			tracing::warn!(
				component = "submission",
				status = response.status,
				"No data in response"
			);
			return Outcome::TransportFailure {
				detail: format!("Empty response body (status {})", response.status),
			};
		}

		match Order::decode(&response.body) {
			Ok(confirmed) => {
				let message = confirmed.confirmation_message();
				tracing::info!(
					component = "submission",
					status = response.status,
					cake_type = %confirmed.cake_type,
					quantity = confirmed.quantity,
					"Order confirmed"
				);
				Outcome::Success { message }
			},
			Err(e) => {
				let raw_body = String::from_utf8_lossy(&response.body).into_owned();
				tracing::warn!(
					component = "submission",
					status = response.status,
					error = %e,
					body = %raw_body,
					"Invalid response"
				);
				Outcome::DecodeFailure { raw_body }
			},
		}
	}
}
