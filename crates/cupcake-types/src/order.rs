//! Cupcake order model and its wire encoding.
//!
//! This module defines the order a customer fills in on the order screen,
//! the derived validity gate for the shipping address, and the JSON schema
//! exchanged with the order endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Errors that can occur while encoding or decoding an order.
#[derive(Debug, Error)]
pub enum OrderError {
	/// Error that occurs when an order cannot be serialized.
	#[error("Failed to encode order: {0}")]
	Encode(String),
	/// Error that occurs when a payload does not match the wire schema.
	#[error("Malformed payload: {0}")]
	MalformedPayload(String),
}

/// Flavors offered by the shop, in wire index order.
///
/// On the wire a flavor travels as its integer index into [`CakeType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CakeType {
	#[default]
	Vanilla,
	Chocolate,
	Strawberry,
	Rainbow,
}

impl CakeType {
	/// All flavors ordered by wire index.
	pub const ALL: [CakeType; 4] = [
		CakeType::Vanilla,
		CakeType::Chocolate,
		CakeType::Strawberry,
		CakeType::Rainbow,
	];

	/// Returns the wire index of this flavor.
	pub fn index(&self) -> u8 {
		match self {
			CakeType::Vanilla => 0,
			CakeType::Chocolate => 1,
			CakeType::Strawberry => 2,
			CakeType::Rainbow => 3,
		}
	}

	/// Returns the display name of this flavor.
	pub fn name(&self) -> &'static str {
		match self {
			CakeType::Vanilla => "Vanilla",
			CakeType::Chocolate => "Chocolate",
			CakeType::Strawberry => "Strawberry",
			CakeType::Rainbow => "Rainbow",
		}
	}
}

impl TryFrom<u8> for CakeType {
	type Error = OrderError;

	fn try_from(index: u8) -> Result<Self, Self::Error> {
		CakeType::ALL
			.get(index as usize)
			.copied()
			.ok_or_else(|| {
				OrderError::MalformedPayload(format!(
					"cake type index {} is out of range (0..{})",
					index,
					CakeType::ALL.len()
				))
			})
	}
}

impl From<CakeType> for u8 {
	fn from(cake_type: CakeType) -> Self {
		cake_type.index()
	}
}

impl fmt::Display for CakeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl std::str::FromStr for CakeType {
	type Err = OrderError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		CakeType::ALL
			.into_iter()
			.find(|cake_type| cake_type.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| OrderError::MalformedPayload(format!("unknown cake type '{}'", s)))
	}
}

/// A cupcake order as held by the order screen.
///
/// Field order matters: it is the key order of the encoded JSON object.
/// `special_request` is a client-only gate and never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Selected flavor.
	#[serde(rename = "type")]
	pub cake_type: CakeType,
	/// Number of cakes.
	pub quantity: u32,
	/// Whether the topping options are shown to the customer.
	#[serde(skip)]
	pub special_request: bool,
	/// Extra frosting topping.
	pub extra_frosting: bool,
	/// Sprinkles topping.
	pub add_sprinkles: bool,
	/// Shipping name.
	pub name: String,
	/// Shipping street address.
	pub street_address: String,
	/// Shipping city.
	pub city: String,
	/// Shipping zip code. Not checked for format.
	pub zip: String,
}

impl Order {
	/// Quantities the quantity control allows.
	pub const QUANTITY_RANGE: RangeInclusive<u32> = 3..=20;
	/// Quantity of a fresh order.
	pub const DEFAULT_QUANTITY: u32 = 3;

	/// Creates an order with the default selections and an empty address.
	pub fn new() -> Self {
		Self {
			cake_type: CakeType::default(),
			quantity: Self::DEFAULT_QUANTITY,
			special_request: false,
			extra_frosting: false,
			add_sprinkles: false,
			name: String::new(),
			street_address: String::new(),
			city: String::new(),
			zip: String::new(),
		}
	}

	/// Returns true when every shipping address field is filled in.
	///
	/// Flavor and quantity always hold in-range values and do not take part.
	pub fn is_valid(&self) -> bool {
		!(self.name.is_empty()
			|| self.street_address.is_empty()
			|| self.city.is_empty()
			|| self.zip.is_empty())
	}

	/// Encodes the order into its wire JSON.
	///
	/// Encoding does not look at [`Order::is_valid`]; gating submission is the
	/// caller's job. Topping flags are sent with their last value even when
	/// `special_request` is off.
	pub fn encode(&self) -> Result<Vec<u8>, OrderError> {
		serde_json::to_vec(self).map_err(|e| OrderError::Encode(e.to_string()))
	}

	/// Decodes an order from wire JSON.
	///
	/// Unknown keys are ignored, since echo endpoints add their own fields.
	/// A missing or mistyped schema key yields [`OrderError::MalformedPayload`].
	pub fn decode(bytes: &[u8]) -> Result<Self, OrderError> {
		serde_json::from_slice(bytes).map_err(|e| OrderError::MalformedPayload(e.to_string()))
	}

	/// Builds the confirmation text shown once the order has been accepted.
	pub fn confirmation_message(&self) -> String {
		format!(
			"Your order for {}x {} cupcakes is on its way!",
			self.quantity,
			self.cake_type.name().to_lowercase()
		)
	}
}

impl Default for Order {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn filled_order() -> Order {
		Order {
			name: "Taylor".to_string(),
			street_address: "1 Main St".to_string(),
			city: "Springfield".to_string(),
			zip: "12345".to_string(),
			..Order::new()
		}
	}

	#[test]
	fn test_defaults() {
		let order = Order::new();
		assert_eq!(order.cake_type, CakeType::Vanilla);
		assert_eq!(order.quantity, 3);
		assert!(!order.special_request);
		assert!(!order.extra_frosting);
		assert!(!order.add_sprinkles);
		assert!(order.name.is_empty());
		assert!(!order.is_valid());
	}

	#[test]
	fn test_valid_when_address_complete() {
		assert!(filled_order().is_valid());
	}

	#[test]
	fn test_invalid_when_any_address_field_empty() {
		let clear_fns: [fn(&mut Order); 4] = [
			|o: &mut Order| o.name.clear(),
			|o: &mut Order| o.street_address.clear(),
			|o: &mut Order| o.city.clear(),
			|o: &mut Order| o.zip.clear(),
		];

		for clear in clear_fns {
			let mut order = filled_order();
			clear(&mut order);
			assert!(!order.is_valid(), "expected invalid order: {:?}", order);
		}
	}

	#[test]
	fn test_whitespace_counts_as_filled() {
		let order = Order {
			zip: " ".to_string(),
			..filled_order()
		};
		assert!(order.is_valid());
	}

	#[test]
	fn test_cake_type_names() {
		let names: Vec<&str> = CakeType::ALL.iter().map(|c| c.name()).collect();
		assert_eq!(names, vec!["Vanilla", "Chocolate", "Strawberry", "Rainbow"]);

		for (i, cake_type) in CakeType::ALL.iter().enumerate() {
			assert_eq!(cake_type.index() as usize, i);
			assert_eq!(CakeType::try_from(i as u8).unwrap(), *cake_type);
		}
		assert!(CakeType::try_from(4u8).is_err());
	}

	#[test]
	fn test_cake_type_from_str() {
		assert_eq!("rainbow".parse::<CakeType>().unwrap(), CakeType::Rainbow);
		assert_eq!("Chocolate".parse::<CakeType>().unwrap(), CakeType::Chocolate);
		assert!("lemon".parse::<CakeType>().is_err());
	}

	#[test]
	fn test_encode_exact_bytes() {
		let order = Order {
			cake_type: CakeType::Chocolate,
			quantity: 5,
			extra_frosting: true,
			add_sprinkles: false,
			name: "A".to_string(),
			street_address: "B".to_string(),
			city: "C".to_string(),
			zip: "D".to_string(),
			..Order::new()
		};

		let encoded = String::from_utf8(order.encode().unwrap()).unwrap();
		assert_eq!(
			encoded,
			r#"{"type":1,"quantity":5,"extraFrosting":true,"addSprinkles":false,"name":"A","streetAddress":"B","city":"C","zip":"D"}"#
		);
	}

	#[test]
	fn test_encode_ignores_validity_and_special_request() {
		let order = Order {
			special_request: true,
			..Order::new()
		};
		let encoded: serde_json::Value = serde_json::from_slice(&order.encode().unwrap()).unwrap();

		assert!(encoded.get("specialRequest").is_none());
		assert_eq!(encoded["name"], "");
		assert_eq!(encoded.as_object().unwrap().len(), 8);
	}

	#[test]
	fn test_toppings_encoded_when_gate_off() {
		let order = Order {
			special_request: false,
			extra_frosting: true,
			add_sprinkles: true,
			..filled_order()
		};
		let encoded: serde_json::Value = serde_json::from_slice(&order.encode().unwrap()).unwrap();

		assert_eq!(encoded["extraFrosting"], true);
		assert_eq!(encoded["addSprinkles"], true);
	}

	#[test]
	fn test_decode_reverses_encode() {
		let addresses = [
			("A", "B", "C", "D"),
			(
				"Jo \"JJ\" O'Neil",
				"12 Back\\slash Rd\nApt 4",
				"Zürich",
				"80\t33",
			),
			("山田 太郎", "1-2-3 Shibuya 🧁", "東京", "150-0002"),
		];

		for cake_type in CakeType::ALL {
			for quantity in [*Order::QUANTITY_RANGE.start(), *Order::QUANTITY_RANGE.end()] {
				for (extra_frosting, add_sprinkles) in
					[(false, false), (false, true), (true, false), (true, true)]
				{
					for (name, street_address, city, zip) in addresses {
						let order = Order {
							cake_type,
							quantity,
							special_request: false,
							extra_frosting,
							add_sprinkles,
							name: name.to_string(),
							street_address: street_address.to_string(),
							city: city.to_string(),
							zip: zip.to_string(),
						};

						let decoded = Order::decode(&order.encode().unwrap()).unwrap();
						assert_eq!(decoded, order);
					}
				}
			}
		}
	}

	#[test]
	fn test_special_request_not_carried_over_the_wire() {
		let order = Order {
			special_request: true,
			..filled_order()
		};

		let decoded = Order::decode(&order.encode().unwrap()).unwrap();
		assert_eq!(
			decoded,
			Order {
				special_request: false,
				..order
			}
		);
	}

	#[test]
	fn test_decode_ignores_extra_fields() {
		let body = br#"{"type":2,"quantity":7,"extraFrosting":false,"addSprinkles":true,"name":"A","streetAddress":"B","city":"C","zip":"D","id":"481","createdAt":"2019-07-06T10:00:00.000Z"}"#;

		let decoded = Order::decode(body).unwrap();
		assert_eq!(decoded.cake_type, CakeType::Strawberry);
		assert_eq!(decoded.quantity, 7);
	}

	#[test]
	fn test_decode_missing_field() {
		let body = br#"{"type":1,"quantity":5,"extraFrosting":true,"addSprinkles":false,"name":"A","streetAddress":"B","city":"C"}"#;

		let result = Order::decode(body);
		assert!(matches!(result, Err(OrderError::MalformedPayload(_))));
		assert!(result.unwrap_err().to_string().contains("zip"));
	}

	#[test]
	fn test_decode_wrong_type() {
		let body = br#"{"type":"1","quantity":5,"extraFrosting":true,"addSprinkles":false,"name":"A","streetAddress":"B","city":"C","zip":"D"}"#;
		assert!(matches!(
			Order::decode(body),
			Err(OrderError::MalformedPayload(_))
		));
	}

	#[test]
	fn test_decode_out_of_range_cake_type() {
		let body = br#"{"type":9,"quantity":5,"extraFrosting":true,"addSprinkles":false,"name":"A","streetAddress":"B","city":"C","zip":"D"}"#;
		assert!(matches!(
			Order::decode(body),
			Err(OrderError::MalformedPayload(_))
		));
	}

	#[test]
	fn test_decode_negative_quantity() {
		let body = br#"{"type":0,"quantity":-2,"extraFrosting":false,"addSprinkles":false,"name":"A","streetAddress":"B","city":"C","zip":"D"}"#;
		assert!(matches!(
			Order::decode(body),
			Err(OrderError::MalformedPayload(_))
		));
	}

	#[test]
	fn test_decode_not_json() {
		assert!(matches!(
			Order::decode(b"oops"),
			Err(OrderError::MalformedPayload(_))
		));
	}

	#[test]
	fn test_confirmation_message() {
		let order = Order {
			cake_type: CakeType::Chocolate,
			quantity: 5,
			..Order::new()
		};
		assert_eq!(
			order.confirmation_message(),
			"Your order for 5x chocolate cupcakes is on its way!"
		);
		assert_eq!(order.cake_type.name(), "Chocolate");
	}
}
