use crate::room::CreateRoomError;
use crate::store::error::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Type-erased error response
///
/// NOTE: This type is inspired by RFC7807 (Problem Details for HTTP APIs) but spares on a lot of
/// the details to avoid complexity.
///
/// See: <https://www.rfc-editor.org/rfc/rfc7807.html>
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ApiError {
	pub r#type: String,
	pub status: u16,
	pub message: String,
}

impl ApiError {
	pub fn room_not_found(room_id: &str) -> Self {
		Self {
			r#type: "room-not-found".to_string(),
			status: StatusCode::NOT_FOUND.as_u16(),
			message: format!("Room '{room_id}' does not exist"),
		}
	}

	pub fn internal_server_error(message: String) -> Self {
		Self {
			r#type: "internal-server-error".to_string(),
			status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
			message,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status_code = StatusCode::from_u16(self.status).expect("StatusCode could not be mapped.");
		(status_code, Json(self)).into_response()
	}
}

impl From<StoreError> for ApiError {
	fn from(error: StoreError) -> Self {
		Self::internal_server_error(error.to_string())
	}
}

impl From<CreateRoomError> for ApiError {
	fn from(error: CreateRoomError) -> Self {
		Self::internal_server_error(error.to_string())
	}
}
