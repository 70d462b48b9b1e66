//! Builder for order sessions.
//!
//! Turns a [`Config`] into a ready [`OrderSession`] by running the factory
//! function registered for each configured submission implementation and
//! keeping the primary one.

use crate::event_bus::EventBus;
use crate::session::OrderSession;
use cupcake_config::Config;
use cupcake_submission::{SubmissionError, SubmissionInterface, SubmissionService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during session construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Factory functions for submission implementations, keyed by the name used
/// under `[submission.implementations]`.
pub struct SessionFactories<SF> {
	pub submission_factories: HashMap<String, SF>,
}

/// Builder for constructing an OrderSession with a pluggable transport.
pub struct SessionBuilder {
	config: Config,
}

impl SessionBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the session using the registered factories.
	///
	/// Every configured implementation with a factory is created so that
	/// configuration mistakes surface even in non-primary entries.
	pub fn build<SF>(self, factories: SessionFactories<SF>) -> Result<OrderSession, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn SubmissionInterface>, SubmissionError>,
	{
		let mut submission_impls = HashMap::new();
		for (name, config) in &self.config.submission.implementations {
			let Some(factory) = factories.submission_factories.get(name) else {
				tracing::warn!(
					component = "submission",
					implementation = %name,
					"No factory registered, skipping"
				);
				continue;
			};

			match factory(config) {
				Ok(implementation) => {
					// Validate the configuration using the implementation's schema
					if let Err(e) = implementation.config_schema().validate(config) {
						tracing::error!(
							component = "submission",
							implementation = %name,
							error = %e,
							"Invalid configuration for submission implementation"
						);
						return Err(BuilderError::Config(format!(
							"Invalid configuration for submission implementation '{}': {}",
							name, e
						)));
					}
					submission_impls.insert(name.clone(), implementation);
					let is_primary = &self.config.submission.primary == name;
					tracing::info!(component = "submission", implementation = %name, enabled = %is_primary, "Loaded");
				},
				Err(e) => {
					tracing::error!(
						component = "submission",
						implementation = %name,
						error = %e,
						"Failed to create submission implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create submission implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		if submission_impls.is_empty() {
			return Err(BuilderError::Config(
				"No valid submission implementations available".into(),
			));
		}

		let primary = &self.config.submission.primary;
		let transport = submission_impls.remove(primary).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary submission '{}' failed to load or has no factory",
				primary
			))
		})?;

		let submission = Arc::new(SubmissionService::new(transport));
		let event_bus = EventBus::new(self.config.session.event_capacity);

		tracing::info!(app = %self.config.app.id, transport = %primary, "Order session ready");

		Ok(OrderSession::new(submission, event_bus))
	}
}
