use crate::store::Store;
use crate::store::error::StoreError;
use crate::store::models::Room;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub const ROOM_ID_LENGTH: usize = 6;
const MAX_GENERATION_ATTEMPTS: u32 = 16;

#[derive(Debug, thiserror::Error)]
pub enum CreateRoomError {
	#[error("Gave up looking for a free room id after {attempts} attempts")]
	IdSpaceExhausted { attempts: u32 },
	#[error(transparent)]
	Store(#[from] StoreError),
}

/// Creates rooms under collision-free short identifiers and looks them up.
#[derive(Clone)]
pub struct RoomManager {
	store: Arc<dyn Store>,
}

impl RoomManager {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	/// Generates a fresh [`ROOM_ID_LENGTH`] character id and persists the
	/// room under it. The existence pre-check is advisory; the store's
	/// unique constraint settles races between concurrent creations.
	pub async fn create_room(&self, name: &str) -> Result<Room, CreateRoomError> {
		for attempt in 1..=MAX_GENERATION_ATTEMPTS {
			let candidate = generate_room_id();
			if self.store.room_exists(&candidate).await? {
				continue;
			}

			match self.store.insert_room(&candidate, name).await {
				Ok(room) => {
					info!("Created room '{}' with id '{}'", room.name, room.id);
					return Ok(room);
				}
				Err(StoreError::UniqueViolation(_)) => {
					debug!("Lost room id '{candidate}' to a concurrent creation (attempt {attempt})");
				}
				Err(error) => return Err(error.into()),
			}
		}

		Err(CreateRoomError::IdSpaceExhausted {
			attempts: MAX_GENERATION_ATTEMPTS,
		})
	}

	/// Pure read-through; an unknown id is `Ok(None)`, not an error.
	pub async fn get_room(&self, room_id: &str) -> Result<Option<Room>, StoreError> {
		self.store.get_room(room_id).await
	}
}

fn generate_room_id() -> String {
	let mut buffer = Uuid::encode_buffer();
	Uuid::new_v4().simple().encode_lower(&mut buffer)[..ROOM_ID_LENGTH].to_string()
}
