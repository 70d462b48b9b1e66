//! HTTP transport for placing orders.
//!
//! Posts the encoded order to a fixed endpoint with reqwest. Configuration:
//!
//! ```toml
//! [submission.implementations.http]
//! endpoint = "https://reqres.in/api/cupcakes"   # optional
//! timeout_seconds = 30                           # optional
//! ```
//!
//! Without `timeout_seconds` the request runs under reqwest's defaults.

use crate::{SubmissionError, SubmissionInterface, TransportResponse};
use async_trait::async_trait;
use cupcake_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Endpoint used when the configuration does not name one.
pub const DEFAULT_ENDPOINT: &str = "https://reqres.in/api/cupcakes";

/// Order transport backed by a reqwest client.
pub struct HttpSubmitter {
	client: reqwest::Client,
	endpoint: String,
}

impl HttpSubmitter {
	/// Creates a transport posting to `endpoint`.
	pub fn new(
		endpoint: impl Into<String>,
		timeout: Option<Duration>,
	) -> Result<Self, SubmissionError> {
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder
			.build()
			.map_err(|e| SubmissionError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			endpoint: endpoint.into(),
		})
	}
}

#[async_trait]
impl SubmissionInterface for HttpSubmitter {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpSubmitterSchema)
	}

	async fn send(&self, body: Vec<u8>) -> Result<TransportResponse, SubmissionError> {
		let response = self
			.client
			.post(&self.endpoint)
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(|e| SubmissionError::Network(e.to_string()))?;

		let status = response.status().as_u16();
		let body = response
			.bytes()
			.await
			.map_err(|e| SubmissionError::Network(format!("Failed to read response body: {}", e)))?;

		tracing::debug!(
			component = "submission",
			implementation = "http",
			status,
			bytes = body.len(),
			"Received response"
		);

		Ok(TransportResponse {
			status,
			body: body.to_vec(),
		})
	}
}

/// Configuration schema for HttpSubmitter.
pub struct HttpSubmitterSchema;

impl HttpSubmitterSchema {
	/// Static validation method for use before instance creation
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		HttpSubmitterSchema.validate(config)
	}
}

impl ConfigSchema for HttpSubmitterSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("endpoint", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
							Ok(())
						},
						_ => Err("endpoint must start with http:// or https://".to_string()),
					}
				}),
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
			],
		);
		schema.validate(config)
	}
}

/// Factory function to create an HTTP transport from configuration.
///
/// Configuration parameters:
/// - `endpoint`: URL orders are posted to (default: [`DEFAULT_ENDPOINT`])
/// - `timeout_seconds`: whole-request timeout, 1 to 300 (default: none)
pub fn create_submitter(
	config: &toml::Value,
) -> Result<Box<dyn SubmissionInterface>, SubmissionError> {
	HttpSubmitterSchema::validate_config(config)
		.map_err(|e| SubmissionError::Configuration(format!("Invalid configuration: {}", e)))?;

	let endpoint = config
		.get("endpoint")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_ENDPOINT);

	let timeout = config
		.get("timeout_seconds")
		.and_then(|v| v.as_integer())
		.map(|secs| Duration::from_secs(secs as u64));

	Ok(Box::new(HttpSubmitter::new(endpoint, timeout)?))
}
