//! Validation of transport configuration tables.
//!
//! Each submission transport receives its own TOML table from the
//! configuration file. Transports describe the keys they accept with a
//! [`Schema`] and check the table before building themselves.

use thiserror::Error;

/// Errors that can occur while validating a configuration table.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// A required key is absent.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A key is present that the schema does not know about.
	#[error("Unknown field: {0}")]
	UnknownField(String),
	/// A key holds a value rejected by its bounds or validator.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// A key holds a value of the wrong TOML type.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Expected TOML type of a configuration key.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// Integer with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	Boolean,
}

/// Custom check run after the type check passes.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A single key in a [`Schema`].
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a validator that receives the raw value and returns an
	/// error message on rejection.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		check_type(&self.name, value, &self.field_type)?;

		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}

		Ok(())
	}
}

/// The set of keys a configuration table may contain.
///
/// Keys outside `required` and `optional` are rejected, so a misspelt key
/// surfaces at startup instead of silently falling back to a default.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates `config` against this schema.
	///
	/// # Errors
	///
	/// Returns the first problem found: a non-table root, a missing required
	/// key, an unknown key, a type mismatch, or a failed validator.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		if let Some(unknown) = table.keys().find(|key| !self.knows(key)) {
			return Err(ValidationError::UnknownField(unknown.clone()));
		}

		Ok(())
	}

	fn knows(&self, key: &str) -> bool {
		self.required
			.iter()
			.chain(self.optional.iter())
			.any(|field| field.name == key)
	}
}

fn check_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	let mismatch = |expected: &str| ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	};

	match expected_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(mismatch("string"));
			}
		},
		FieldType::Boolean => {
			if !value.is_bool() {
				return Err(mismatch("boolean"));
			}
		},
		FieldType::Integer { min, max } => {
			let int_val = value.as_integer().ok_or_else(|| mismatch("integer"))?;

			if let Some(min_val) = min.filter(|min_val| int_val < *min_val) {
				return Err(ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Value {} is less than minimum {}", int_val, min_val),
				});
			}
			if let Some(max_val) = max.filter(|max_val| int_val > *max_val) {
				return Err(ValidationError::InvalidValue {
					field: field_name.to_string(),
					message: format!("Value {} is greater than maximum {}", int_val, max_val),
				});
			}
		},
	}

	Ok(())
}

/// Implemented by anything that can check its own configuration table.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn transport_schema() -> Schema {
		Schema::new(
			vec![Field::new("endpoint", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(url) if url.starts_with("http") => Ok(()),
					_ => Err("must be an http(s) URL".to_string()),
				}
			})],
			vec![
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
				Field::new("verbose", FieldType::Boolean),
			],
		)
	}

	fn table(s: &str) -> toml::Value {
		toml::from_str(s).unwrap()
	}

	#[test]
	fn test_accepts_valid_table() {
		let config = table(
			r#"
endpoint = "https://example.com/orders"
timeout_seconds = 10
"#,
		);
		assert!(transport_schema().validate(&config).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let result = transport_schema().validate(&table("timeout_seconds = 10"));
		assert!(matches!(result, Err(ValidationError::MissingField(f)) if f == "endpoint"));
	}

	#[test]
	fn test_unknown_field_rejected() {
		let config = table(
			r#"
endpoint = "https://example.com/orders"
endpont = "typo"
"#,
		);
		let result = transport_schema().validate(&config);
		assert!(matches!(result, Err(ValidationError::UnknownField(f)) if f == "endpont"));
	}

	#[test]
	fn test_integer_bounds() {
		let config = table(
			r#"
endpoint = "https://example.com/orders"
timeout_seconds = 0
"#,
		);
		let err = transport_schema().validate(&config).unwrap_err();
		assert!(err.to_string().contains("less than minimum 1"));

		let config = table(
			r#"
endpoint = "https://example.com/orders"
timeout_seconds = 301
"#,
		);
		let err = transport_schema().validate(&config).unwrap_err();
		assert!(err.to_string().contains("greater than maximum 300"));
	}

	#[test]
	fn test_type_mismatch() {
		let config = table(
			r#"
endpoint = "https://example.com/orders"
verbose = "yes"
"#,
		);
		let result = transport_schema().validate(&config);
		assert!(matches!(
			result,
			Err(ValidationError::TypeMismatch { ref field, .. }) if field == "verbose"
		));
	}

	#[test]
	fn test_custom_validator() {
		let result = transport_schema().validate(&table(r#"endpoint = "ftp://example.com""#));
		assert!(matches!(
			result,
			Err(ValidationError::InvalidValue { ref message, .. }) if message.contains("http(s)")
		));
	}

	#[test]
	fn test_root_must_be_table() {
		let result = transport_schema().validate(&toml::Value::Integer(3));
		assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
	}
}
