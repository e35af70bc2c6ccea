use crate::context::ApplicationContext;
use crate::history::{DEFAULT_PAGE_SIZE, HistoryService, MessagePage};
use crate::room::RoomManager;
use crate::server::rest_api::error::ApiError;
use crate::store::models::Room;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

pub mod error;

/// The operation surface: create room, look a room up, page through its
/// history. Real-time sends go through the websocket endpoint instead.
pub fn router() -> Router<ApplicationContext> {
	Router::new()
		.route("/rooms", post(create_room))
		.route("/rooms/{room_id}", get(get_room))
		.route("/rooms/{room_id}/messages", get(get_room_messages))
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CreateRoomRequest {
	#[serde(default)]
	pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RoomResponse {
	pub id: String,
	pub name: String,
}

impl From<Room> for RoomResponse {
	fn from(Room { id, name }: Room) -> Self {
		Self { id, name }
	}
}

async fn create_room(
	State(room_manager): State<RoomManager>,
	Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), ApiError> {
	let room = room_manager.create_room(&request.name).await?;

	Ok((StatusCode::CREATED, Json(room.into())))
}

async fn get_room(
	State(room_manager): State<RoomManager>,
	Path(room_id): Path<String>,
) -> Result<Json<RoomResponse>, ApiError> {
	let room = room_manager
		.get_room(&room_id)
		.await?
		.ok_or_else(|| ApiError::room_not_found(&room_id))?;

	Ok(Json(room.into()))
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct HistoryQuery {
	#[serde(default)]
	pub page_number: i64,
	#[serde(default = "default_page_size")]
	pub page_size: i64,
}

fn default_page_size() -> i64 {
	DEFAULT_PAGE_SIZE
}

async fn get_room_messages(
	State(history_service): State<HistoryService>,
	Path(room_id): Path<String>,
	Query(query): Query<HistoryQuery>,
) -> Result<Json<MessagePage>, ApiError> {
	let page = history_service
		.messages_of_room(&room_id, query.page_number, query.page_size)
		.await?;

	Ok(Json(page))
}
