//! Broadcast channel carrying session events to the presentation layer.

use cupcake_types::SessionEvent;
use tokio::sync::broadcast;

/// Event bus built on a tokio broadcast channel.
///
/// Subscribers own their receivers; the bus keeps no reference to them.
/// A subscriber that falls more than `capacity` events behind loses the
/// oldest ones.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
	/// Creates a new event bus buffering up to `capacity` events per subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Returns a receiver for every event published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns the number of subscribers reached. Publishing with nobody
	/// listening is not an error.
	pub fn publish(&self, event: SessionEvent) -> usize {
		match self.sender.send(event) {
			Ok(receivers) => receivers,
			Err(_) => {
				tracing::trace!("Event published with no subscribers");
				0
			},
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.sender.receiver_count()
	}
}
