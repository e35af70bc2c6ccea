use crate::message::{ChatBroadcast, ChatRequest};
use crate::store::error::StoreError;
use crate::store::{NewMessage, Store};
use crate::transport::{Transport, room_destination};
use crate::utils::clock::Clock;
use std::sync::Arc;
use tracing::debug;

pub const ANONYMOUS_SENDER: &str = "Anonymous";

#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
	#[error("Room '{0}' does not exist")]
	RoomNotFound(String),
	#[error("Message content is required")]
	EmptyContent,
	#[error(transparent)]
	Store(#[from] StoreError),
}

impl SendMessageError {
	/// Client-input errors are reported to the originating client only.
	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::RoomNotFound(_) | Self::EmptyContent)
	}
}

/// Validates, normalizes, timestamps, persists and broadcasts incoming
/// messages, one pass per message. A failed send is the caller's to retry.
#[derive(Clone)]
pub struct MessagePipeline {
	store: Arc<dyn Store>,
	transport: Arc<dyn Transport>,
	clock: Clock,
}

impl MessagePipeline {
	pub fn new(store: Arc<dyn Store>, transport: Arc<dyn Transport>, clock: Clock) -> Self {
		Self {
			store,
			transport,
			clock,
		}
	}

	/// `room_id` is the routing parameter and authoritative over anything the
	/// client put into the request body. Nothing is persisted or broadcast
	/// for rejected messages.
	pub async fn handle_message(&self, room_id: &str, request: ChatRequest) -> Result<ChatBroadcast, SendMessageError> {
		if !self.store.room_exists(room_id).await? {
			return Err(SendMessageError::RoomNotFound(room_id.to_string()));
		}

		let content = request.content.trim();
		if content.is_empty() {
			return Err(SendMessageError::EmptyContent);
		}

		let sender = match request.sender.as_deref().map(str::trim) {
			None | Some("") => ANONYMOUS_SENDER,
			Some(sender) => sender,
		};

		let message = self
			.store
			.insert_message(NewMessage {
				room_id: room_id.to_string(),
				sender: sender.to_string(),
				content: content.to_string(),
				timestamp: self.clock.now(),
			})
			.await?;
		debug!("Persisted message '{}' in room '{room_id}'", message.id);

		let broadcast = ChatBroadcast::from(message);
		self.transport.publish(&room_destination(room_id), broadcast.clone());

		Ok(broadcast)
	}
}
