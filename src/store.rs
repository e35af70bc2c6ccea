use crate::store::error::StoreError;
use crate::store::models::{ChatMessage, Room};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use static_assertions::assert_obj_safe;

pub mod error;
pub mod models;
pub mod sqlite;

/// Durable storage for rooms and messages. The store is the sole owner of
/// both record types; services read and write through it per request.
#[async_trait]
pub trait Store: Send + Sync {
	async fn room_exists(&self, room_id: &str) -> Result<bool, StoreError>;
	async fn get_room(&self, room_id: &str) -> Result<Option<Room>, StoreError>;
	/// Inserts a room with the given id. Fails with [`StoreError::UniqueViolation`]
	/// if the id is already taken.
	async fn insert_room(&self, room_id: &str, name: &str) -> Result<Room, StoreError>;
	/// Inserts a message, assigning its identifier.
	async fn insert_message(&self, message: NewMessage) -> Result<ChatMessage, StoreError>;
	/// Messages of a room, newest first.
	async fn messages_by_room(&self, room_id: &str, limit: i64, offset: i64) -> Result<Vec<ChatMessage>, StoreError>;
	async fn count_messages(&self, room_id: &str) -> Result<i64, StoreError>;
}

assert_obj_safe!(Store);

/// A normalized message as handed to the store, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
	pub room_id: String,
	pub sender: String,
	pub content: String,
	pub timestamp: DateTime<Utc>,
}
