//! Observable order session.
//!
//! An [`OrderSession`] owns the order being edited on the order screen. Each
//! field write publishes an [`OrderEvent::Changed`] so the presentation layer
//! can re-render and re-read the validity gate. Placing the order goes
//! through the [`SubmissionService`] and reports progress on the same bus.

use crate::event_bus::EventBus;
use cupcake_submission::SubmissionService;
use cupcake_types::{
	CakeType, Order, OrderEvent, OrderField, Outcome, SessionEvent, SubmissionEvent,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Reasons a session refuses to place an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
	/// Some shipping address field is empty.
	#[error("Order is not valid: every address field must be filled in")]
	InvalidOrder,
	/// A previous submission has not resolved yet.
	#[error("A submission is already in flight")]
	SubmissionInFlight,
}

/// The order being edited during one screen session.
pub struct OrderSession {
	order: Order,
	submission: Arc<SubmissionService>,
	event_bus: EventBus,
	in_flight: AtomicBool,
}

/// Clears the in-flight flag when a submission ends, including on cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

impl OrderSession {
	/// Creates a session holding a fresh order.
	pub fn new(submission: Arc<SubmissionService>, event_bus: EventBus) -> Self {
		Self {
			order: Order::new(),
			submission,
			event_bus,
			in_flight: AtomicBool::new(false),
		}
	}

	/// Returns a receiver for order changes and submission progress.
	pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.event_bus.subscribe()
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// Current order state.
	pub fn order(&self) -> &Order {
		&self.order
	}

	/// Whether every address field is filled in. Recomputed on each call.
	pub fn is_valid(&self) -> bool {
		self.order.is_valid()
	}

	/// Whether the place-order control should be enabled.
	pub fn can_submit(&self) -> bool {
		self.is_valid() && !self.in_flight.load(Ordering::Acquire)
	}

	pub fn set_cake_type(&mut self, cake_type: CakeType) {
		self.order.cake_type = cake_type;
		self.changed(OrderField::CakeType);
	}

	/// Sets the quantity, clamped to [`Order::QUANTITY_RANGE`] like the stepper.
	pub fn set_quantity(&mut self, quantity: u32) {
		self.order.quantity = quantity.clamp(
			*Order::QUANTITY_RANGE.start(),
			*Order::QUANTITY_RANGE.end(),
		);
		self.changed(OrderField::Quantity);
	}

	pub fn set_special_request(&mut self, enabled: bool) {
		self.order.special_request = enabled;
		self.changed(OrderField::SpecialRequest);
	}

	pub fn set_extra_frosting(&mut self, enabled: bool) {
		self.order.extra_frosting = enabled;
		self.changed(OrderField::ExtraFrosting);
	}

	pub fn set_add_sprinkles(&mut self, enabled: bool) {
		self.order.add_sprinkles = enabled;
		self.changed(OrderField::AddSprinkles);
	}

	pub fn set_name(&mut self, name: impl Into<String>) {
		self.order.name = name.into();
		self.changed(OrderField::Name);
	}

	pub fn set_street_address(&mut self, street_address: impl Into<String>) {
		self.order.street_address = street_address.into();
		self.changed(OrderField::StreetAddress);
	}

	pub fn set_city(&mut self, city: impl Into<String>) {
		self.order.city = city.into();
		self.changed(OrderField::City);
	}

	pub fn set_zip(&mut self, zip: impl Into<String>) {
		self.order.zip = zip.into();
		self.changed(OrderField::Zip);
	}

	fn changed(&self, field: OrderField) {
		self.event_bus
			.publish(SessionEvent::Order(OrderEvent::Changed { field }));
	}

	/// Places the current order.
	///
	/// Refuses when the order is invalid or when an earlier call has not
	/// resolved. Otherwise sends exactly one request and returns its outcome.
	/// Failure outcomes are reported on the bus and in logs; only the caller
	/// decides whether to show them.
	pub async fn place_order(&self) -> Result<Outcome, SessionError> {
		if !self.is_valid() {
			return Err(SessionError::InvalidOrder);
		}

		if self
			.in_flight
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			tracing::warn!(component = "session", "Ignoring place order while a submission is in flight");
			return Err(SessionError::SubmissionInFlight);
		}
		let _guard = InFlightGuard(&self.in_flight);

		self.event_bus
			.publish(SessionEvent::Submission(SubmissionEvent::Started));

		let outcome = self.submission.submit_order(&self.order).await;

		let event = match &outcome {
			Outcome::Success { message } => SubmissionEvent::Succeeded {
				message: message.clone(),
			},
			failure => SubmissionEvent::Failed {
				reason: failure.to_string(),
			},
		};
		self.event_bus.publish(SessionEvent::Submission(event));

		Ok(outcome)
	}
}
