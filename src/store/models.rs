use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(FromRow, Clone, Debug, PartialEq, Eq)]
pub struct Room {
	pub id: String,
	pub name: String,
}

#[derive(FromRow, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
	pub id: Uuid,
	pub room_id: String,
	pub sender: String,
	pub content: String,
	pub timestamp: DateTime<Utc>,
}
