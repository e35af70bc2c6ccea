use crate::chat::MessagePipeline;
use crate::message::{ClientRequest, ErrorMessage, ErrorMessageType, ServerMessage};
use crate::room::RoomManager;
use crate::server::rest_api::error::ApiError;
use crate::transport::{Transport, room_destination};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, warn};

/// Joins the client to a room: subscribes it to the room's broadcast
/// destination and routes every frame it sends through the message pipeline.
pub async fn room_websocket(
	State(room_manager): State<RoomManager>,
	State(message_pipeline): State<MessagePipeline>,
	State(transport): State<Arc<dyn Transport>>,
	Path(room_id): Path<String>,
	upgrade: WebSocketUpgrade,
) -> Result<Response, ApiError> {
	if room_manager.get_room(&room_id).await?.is_none() {
		return Err(ApiError::room_not_found(&room_id));
	}

	Ok(upgrade.on_upgrade(move |socket| handle_socket(socket, room_id, message_pipeline, transport)))
}

async fn handle_socket(
	socket: WebSocket,
	room_id: String,
	message_pipeline: MessagePipeline,
	transport: Arc<dyn Transport>,
) {
	// Subscribe before handling any send so the client sees its own messages.
	let mut broadcasts = BroadcastStream::new(transport.subscribe(&room_destination(&room_id)));
	let (mut sink, mut stream) = socket.split();

	loop {
		tokio::select! {
			broadcast = broadcasts.next() => match broadcast {
				Some(Ok(chat)) => {
					if send(&mut sink, &ServerMessage::Chat(chat)).await.is_err() {
						break;
					}
				}
				Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
					warn!("Dropped {skipped} broadcasts for a slow subscriber of room '{room_id}'");
				}
				None => break,
			},
			request = stream.next() => match request {
				Some(Ok(Message::Text(text))) => {
					if handle_request(&mut sink, &room_id, &message_pipeline, text.as_str()).await.is_err() {
						break;
					}
				}
				Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
				// pings and pongs are answered by axum itself
				Some(Ok(_)) => {}
			},
		}
	}
}

async fn handle_request(
	sink: &mut SplitSink<WebSocket, Message>,
	room_id: &str,
	message_pipeline: &MessagePipeline,
	text: &str,
) -> Result<(), axum::Error> {
	let request = match serde_json::from_str::<ClientRequest>(text) {
		Ok(request) => request,
		Err(error) => {
			debug!("Received malformed request in room '{room_id}': {error}");
			let error_message = ErrorMessage {
				error: ErrorMessageType::InvalidFormat,
				message: error.to_string(),
			};
			return send(sink, &error_message.into()).await;
		}
	};

	match request {
		ClientRequest::Chat(chat_request) => {
			match message_pipeline.handle_message(room_id, chat_request).await {
				// Fan-out happens through the transport; this connection is a
				// subscriber like any other.
				Ok(_) => Ok(()),
				Err(error) => {
					let error_type = if error.is_client_error() {
						ErrorMessageType::InvalidOperation
					} else {
						ErrorMessageType::InternalServerError
					};
					let error_message = ErrorMessage {
						error: error_type,
						message: error.to_string(),
					};
					send(sink, &error_message.into()).await
				}
			}
		}
	}
}

async fn send(sink: &mut SplitSink<WebSocket, Message>, message: &ServerMessage) -> Result<(), axum::Error> {
	let json = serde_json::to_string(message).expect("Failed to serialize server message");
	sink.send(Message::Text(json.into())).await
}
