//! Configuration for the Cupcake Corner order client.
//!
//! Configuration is read from a TOML file. `${VAR}` and `${VAR:-default}`
//! references are resolved from the environment before parsing, and the
//! parsed result is validated before it is handed out.
//!
//! ```toml
//! [app]
//! id = "cupcake-corner"
//!
//! [submission]
//! primary = "http"
//! [submission.implementations.http]
//! endpoint = "${CUPCAKE_ENDPOINT:-https://reqres.in/api/cupcakes}"
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep only the message, the full error echoes the whole input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this client instance.
	pub app: AppConfig,
	/// Transports used to place orders.
	pub submission: SubmissionConfig,
	/// Order session settings.
	#[serde(default)]
	pub session: SessionConfig,
}

/// Identity of this client instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
	/// Identifier included in logs.
	pub id: String,
}

/// Configuration for order submission transports.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionConfig {
	/// Which implementation places orders.
	pub primary: String,
	/// Map of implementation names to their raw TOML tables.
	/// Each implementation validates its own table.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the order session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
	/// Number of events buffered per subscriber before the oldest are dropped.
	#[serde(default = "default_event_capacity")]
	pub event_capacity: usize,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			event_capacity: default_event_capacity(),
		}
	}
}

fn default_event_capacity() -> usize {
	64
}

/// Largest accepted `session.event_capacity`.
pub const MAX_EVENT_CAPACITY: usize = 65_536;

/// Configuration used when no file is given. The endpoint can still be
/// overridden through `CUPCAKE_ENDPOINT`.
const BUILTIN_CONFIG: &str = r#"
[app]
id = "cupcake-corner"

[submission]
primary = "http"
[submission.implementations.http]
endpoint = "${CUPCAKE_ENDPOINT:-https://reqres.in/api/cupcakes}"
"#;

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of `VAR_NAME`, or with the text after
/// `:-` in `${VAR_NAME:-default}` when the variable is unset.
///
/// Input is limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut resolved = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		resolved.push_str(&input[last_end..full_match.start()]);
		resolved.push_str(&value);
		last_end = full_match.end();
	}

	resolved.push_str(&input[last_end..]);
	Ok(resolved)
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Returns the built-in configuration: the HTTP transport against the
	/// default endpoint, after environment resolution.
	pub fn builtin() -> Result<Self, ConfigError> {
		BUILTIN_CONFIG.parse()
	}

	/// Returns the configuration of the primary submission implementation.
	pub fn primary_submission(&self) -> Option<&toml::Value> {
		self.submission.implementations.get(&self.submission.primary)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.app.id.is_empty() {
			return Err(ConfigError::Validation("App ID cannot be empty".into()));
		}

		if self.submission.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one submission implementation must be configured".into(),
			));
		}
		if self.submission.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Submission primary implementation cannot be empty".into(),
			));
		}
		if self.primary_submission().is_none() {
			return Err(ConfigError::Validation(format!(
				"Primary submission implementation '{}' is not configured",
				self.submission.primary
			)));
		}

		if self.session.event_capacity == 0 {
			return Err(ConfigError::Validation(
				"Session event_capacity must be greater than 0".into(),
			));
		}
		if self.session.event_capacity > MAX_EVENT_CAPACITY {
			return Err(ConfigError::Validation(format!(
				"Session event_capacity must be at most {}, got {}",
				MAX_EVENT_CAPACITY, self.session.event_capacity
			)));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved first and the result is validated.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
