//! In-process echo transport.
//!
//! Replies to every order with the order itself, the way the public demo
//! endpoint does, without touching the network. Useful for offline runs and
//! tests.

use crate::{SubmissionError, SubmissionInterface, TransportResponse};
use async_trait::async_trait;
use cupcake_types::{ConfigSchema, Schema, ValidationError};

/// Status reported for every echoed order.
const ECHO_STATUS: u16 = 201;

/// Transport that answers with the request body.
#[derive(Debug, Default)]
pub struct EchoSubmitter;

impl EchoSubmitter {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl SubmissionInterface for EchoSubmitter {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(EchoSubmitterSchema)
	}

	async fn send(&self, body: Vec<u8>) -> Result<TransportResponse, SubmissionError> {
		tracing::debug!(
			component = "submission",
			implementation = "echo",
			bytes = body.len(),
			"Echoing order"
		);
		Ok(TransportResponse {
			status: ECHO_STATUS,
			body,
		})
	}
}

/// Configuration schema for EchoSubmitter.
pub struct EchoSubmitterSchema;

impl ConfigSchema for EchoSubmitterSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Echo takes no settings
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create an echo transport from configuration.
///
/// Configuration parameters:
/// - None
pub fn create_submitter(
	config: &toml::Value,
) -> Result<Box<dyn SubmissionInterface>, SubmissionError> {
	EchoSubmitterSchema
		.validate(config)
		.map_err(|e| SubmissionError::Configuration(format!("Invalid configuration: {}", e)))?;
	Ok(Box::new(EchoSubmitter::new()))
}
