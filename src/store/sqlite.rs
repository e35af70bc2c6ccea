use crate::store::error::{IntoStoreResult, StoreError};
use crate::store::models::{ChatMessage, Room};
use crate::store::{NewMessage, Store};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{SqlitePool, migrate, query_as, query_scalar};
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteStore {
	pool: SqlitePool,
}

impl SqliteStore {
	pub async fn new(database_url: &str) -> Result<Self, StoreError> {
		// A single connection keeps `sqlite::memory:` databases coherent;
		// SQLite serializes writes regardless.
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.connect(database_url)
			.await
			.connection_error("Failed to connect to database")?;
		let store = Self { pool };
		store.migrate().await?;

		Ok(store)
	}

	async fn migrate(&self) -> Result<(), StoreError> {
		migrate!().run(&self.pool).await.map_err(Into::into)
	}
}

#[async_trait]
impl Store for SqliteStore {
	async fn room_exists(&self, room_id: &str) -> Result<bool, StoreError> {
		query_scalar(r"SELECT EXISTS (SELECT 1 FROM room WHERE id = ?1)")
			.bind(room_id)
			.fetch_one(&self.pool)
			.await
			.map_err(Into::into)
	}

	async fn get_room(&self, room_id: &str) -> Result<Option<Room>, StoreError> {
		query_as(r"SELECT id, name FROM room WHERE id = ?1")
			.bind(room_id)
			.fetch_optional(&self.pool)
			.await
			.map_err(Into::into)
	}

	async fn insert_room(&self, room_id: &str, name: &str) -> Result<Room, StoreError> {
		query_as(
			r"INSERT INTO room (id, name) VALUES (?1, ?2)
			RETURNING
				id,
				name",
		)
		.bind(room_id)
		.bind(name)
		.fetch_one(&self.pool)
		.await
		.map_err(Into::into)
	}

	async fn insert_message(
		&self,
		NewMessage {
			room_id,
			sender,
			content,
			timestamp,
		}: NewMessage,
	) -> Result<ChatMessage, StoreError> {
		let id = Uuid::new_v4();
		query_as(
			r"INSERT INTO message (id, room_id, sender, content, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)
			RETURNING
				id,
				room_id,
				sender,
				content,
				timestamp",
		)
		.bind(id)
		.bind(room_id)
		.bind(sender)
		.bind(content)
		.bind(timestamp)
		.fetch_one(&self.pool)
		.await
		.map_err(Into::into)
	}

	async fn messages_by_room(&self, room_id: &str, limit: i64, offset: i64) -> Result<Vec<ChatMessage>, StoreError> {
		query_as(
			r"SELECT id, room_id, sender, content, timestamp
			FROM message
			WHERE room_id = ?1
			ORDER BY timestamp DESC
			LIMIT ?2 OFFSET ?3",
		)
		.bind(room_id)
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.pool)
		.await
		.map_err(Into::into)
	}

	async fn count_messages(&self, room_id: &str) -> Result<i64, StoreError> {
		query_scalar(r"SELECT COUNT(*) FROM message WHERE room_id = ?1")
			.bind(room_id)
			.fetch_one(&self.pool)
			.await
			.map_err(Into::into)
	}
}
