use crate::message::ChatBroadcast;
use parking_lot::RwLock;
use static_assertions::assert_obj_safe;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Name of the destination a room's accepted messages fan out on.
pub fn room_destination(room_id: &str) -> String {
	format!("room/{room_id}")
}

/// Publish/subscribe transport. Publishing is fire-and-forget: it never
/// blocks on subscriber delivery, and subscribers that join afterwards or
/// have fallen behind do not receive the payload.
pub trait Transport: Send + Sync {
	fn publish(&self, destination: &str, payload: ChatBroadcast);
	fn subscribe(&self, destination: &str) -> broadcast::Receiver<ChatBroadcast>;
}

assert_obj_safe!(Transport);

/// In-process transport fanning out over one tokio broadcast channel per
/// destination.
pub struct BroadcastTransport {
	capacity: usize,
	channels: RwLock<HashMap<String, broadcast::Sender<ChatBroadcast>>>,
}

impl BroadcastTransport {
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			channels: RwLock::new(HashMap::new()),
		}
	}
}

impl Transport for BroadcastTransport {
	fn publish(&self, destination: &str, payload: ChatBroadcast) {
		// No channel means nobody has ever subscribed; sending would have no
		// audience either way.
		if let Some(sender) = self.channels.read().get(destination) {
			let _ = sender.send(payload);
		}
	}

	fn subscribe(&self, destination: &str) -> broadcast::Receiver<ChatBroadcast> {
		self.channels
			.write()
			.entry(destination.to_string())
			.or_insert_with(|| broadcast::channel(self.capacity).0)
			.subscribe()
	}
}
