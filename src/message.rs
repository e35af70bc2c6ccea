use crate::store::models::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Requests clients send over an established websocket connection. Unknown
/// fields (including any client-supplied room id or timestamp) are dropped
/// during deserialization; the routing parameter and the server clock are
/// authoritative.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum ClientRequest {
	Chat(ChatRequest),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatRequest {
	#[serde(default)]
	pub sender: Option<String>,
	pub content: String,
}

impl From<ChatRequest> for ClientRequest {
	fn from(request: ChatRequest) -> ClientRequest {
		ClientRequest::Chat(request)
	}
}

/// Messages the server sends to websocket clients.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum ServerMessage {
	Chat(ChatBroadcast),
	Error(ErrorMessage),
}

/// A persisted message as published on a room's broadcast destination.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatBroadcast {
	pub id: Uuid,
	pub room_id: String,
	pub sender: String,
	pub content: String,
	pub timestamp: DateTime<Utc>,
}

impl From<ChatBroadcast> for ServerMessage {
	fn from(broadcast: ChatBroadcast) -> ServerMessage {
		ServerMessage::Chat(broadcast)
	}
}

impl From<ChatMessage> for ChatBroadcast {
	fn from(message: ChatMessage) -> Self {
		let ChatMessage {
			id,
			room_id,
			sender,
			content,
			timestamp,
		} = message;
		Self {
			id,
			room_id,
			sender,
			content,
			timestamp,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ErrorMessage {
	pub error: ErrorMessageType,
	pub message: String,
}

impl From<ErrorMessage> for ServerMessage {
	fn from(error: ErrorMessage) -> ServerMessage {
		ServerMessage::Error(error)
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMessageType {
	InvalidFormat,
	InvalidOperation,
	InternalServerError,
}
