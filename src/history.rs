use crate::message::ChatBroadcast;
use crate::store::Store;
use crate::store::error::StoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// One slice of a room's history plus the metadata to fetch adjacent slices.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MessagePage {
	pub messages: Vec<ChatBroadcast>,
	pub page_number: i64,
	pub page_size: i64,
	pub total_messages: i64,
	pub total_pages: i64,
}

#[derive(Clone)]
pub struct HistoryService {
	store: Arc<dyn Store>,
}

impl HistoryService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	/// Newest-first page of a room's messages. The page number is floored at
	/// zero and the page size silently clamped to `[1, MAX_PAGE_SIZE]`. A
	/// room without messages (known or not) yields an empty page, not an
	/// error; callers that need the distinction look the room up first.
	pub async fn messages_of_room(
		&self,
		room_id: &str,
		page_number: i64,
		page_size: i64,
	) -> Result<MessagePage, StoreError> {
		let page_number = page_number.max(0);
		let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
		let offset = page_number.saturating_mul(page_size);

		let total_messages = self.store.count_messages(room_id).await?;
		let messages = self
			.store
			.messages_by_room(room_id, page_size, offset)
			.await?
			.into_iter()
			.map(Into::into)
			.collect();

		Ok(MessagePage {
			messages,
			page_number,
			page_size,
			total_messages,
			total_pages: (total_messages + page_size - 1) / page_size,
		})
	}
}
