use crate::history::MessagePage;
use crate::message::ServerMessage;
use crate::room::ROOM_ID_LENGTH;
use crate::server::rest_api::error::ApiError;
use crate::server::rest_api::{CreateRoomRequest, RoomResponse};
use crate::server_tests::test_client::TestClient;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

mod test_client;

type WebSocketClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[tokio::test]
async fn creating_a_room_returns_created_and_a_short_id() {
	let client = TestClient::start().await;

	let response = client
		.post("/api/rooms")
		.json(&CreateRoomRequest {
			name: "general".to_string(),
		})
		.send()
		.await
		.expect("Failed to send room creation request");

	assert_eq!(201, response.status().as_u16());
	let room: RoomResponse = response.json().await.expect("Failed to deserialize room response");
	assert_eq!(ROOM_ID_LENGTH, room.id.len());
	assert_eq!("general", room.name);
}

#[tokio::test]
async fn room_lookup_round_trips() {
	let client = TestClient::start().await;
	let room = create_room(&client, "general").await;

	let response = client
		.get(&format!("/api/rooms/{}", room.id))
		.send()
		.await
		.expect("Failed to send room lookup request");

	assert_eq!(200, response.status().as_u16());
	let fetched: RoomResponse = response.json().await.expect("Failed to deserialize room response");
	assert_eq!(room, fetched);
}

#[tokio::test]
async fn unknown_room_lookup_is_a_structured_not_found() {
	let client = TestClient::start().await;

	let response = client
		.get("/api/rooms/nothere")
		.send()
		.await
		.expect("Failed to send room lookup request");

	assert_eq!(404, response.status().as_u16());
	let error: ApiError = response.json().await.expect("Failed to deserialize error response");
	assert_eq!("room-not-found", error.r#type);
}

#[tokio::test]
async fn chat_scenario_from_creation_to_history() {
	let client = TestClient::start().await;
	let room = create_room(&client, "general").await;
	let mut websocket = connect(&client, &room.id).await;

	send_chat(&mut websocket, json!({"type": "chat", "content": " hello "})).await;

	let broadcast = match receive(&mut websocket).await {
		ServerMessage::Chat(broadcast) => broadcast,
		other => panic!("Expected a chat broadcast, got {other:?}"),
	};
	assert_eq!("hello", broadcast.content);
	assert_eq!("Anonymous", broadcast.sender);
	assert_eq!(room.id, broadcast.room_id);
	assert!((Utc::now() - broadcast.timestamp).abs() < chrono::Duration::seconds(60));

	let page: MessagePage = client
		.get(&format!("/api/rooms/{}/messages", room.id))
		.send()
		.await
		.expect("Failed to send history request")
		.json()
		.await
		.expect("Failed to deserialize history page");

	assert_eq!(vec![broadcast], page.messages);
	assert_eq!(0, page.page_number);
	assert_eq!(50, page.page_size);
	assert_eq!(1, page.total_messages);
	assert_eq!(1, page.total_pages);
}

#[tokio::test]
async fn history_is_paged_newest_first() {
	let client = TestClient::start().await;
	let room = create_room(&client, "general").await;
	let mut websocket = connect(&client, &room.id).await;

	for content in ["first", "second", "third"] {
		send_chat(&mut websocket, json!({"type": "chat", "sender": "Bob", "content": content})).await;
		receive(&mut websocket).await;
		// keep the persisted timestamps strictly increasing
		tokio::time::sleep(Duration::from_millis(5)).await;
	}

	let first_page = history_page(&client, &room.id, "page_number=0&page_size=2").await;
	let second_page = history_page(&client, &room.id, "page_number=1&page_size=2").await;

	let contents: Vec<_> = first_page.messages.iter().map(|message| message.content.as_str()).collect();
	assert_eq!(vec!["third", "second"], contents);
	let contents: Vec<_> = second_page.messages.iter().map(|message| message.content.as_str()).collect();
	assert_eq!(vec!["first"], contents);
	assert_eq!(3, first_page.total_messages);
	assert_eq!(2, first_page.total_pages);
}

#[tokio::test]
async fn history_query_parameters_are_clamped() {
	let client = TestClient::start().await;
	let room = create_room(&client, "general").await;

	let oversized = history_page(&client, &room.id, "page_size=1000").await;
	let undersized = history_page(&client, &room.id, "page_number=-5&page_size=0").await;

	assert_eq!(100, oversized.page_size);
	assert_eq!(0, oversized.page_number);
	assert_eq!(1, undersized.page_size);
	assert_eq!(0, undersized.page_number);
}

#[tokio::test]
async fn websocket_upgrade_for_an_unknown_room_is_rejected() {
	let client = TestClient::start().await;

	let error = connect_async(client.websocket_url("ws/rooms/nothere"))
		.await
		.map(|_| ())
		.expect_err("Upgrade succeeded for an unknown room");

	match error {
		tungstenite::Error::Http(response) => assert_eq!(404, response.status().as_u16()),
		other => panic!("Expected an HTTP error, got {other}"),
	}
}

#[tokio::test]
async fn validation_errors_stay_on_the_originating_socket() {
	let client = TestClient::start().await;
	let room = create_room(&client, "general").await;

	// Round-tripping a message through each socket proves its subscription
	// is live before the interesting part starts.
	let mut sending_socket = connect(&client, &room.id).await;
	send_chat(&mut sending_socket, json!({"type": "chat", "content": "sender ready"})).await;
	receive(&mut sending_socket).await;
	let mut observing_socket = connect(&client, &room.id).await;
	send_chat(&mut observing_socket, json!({"type": "chat", "content": "observer ready"})).await;
	receive(&mut observing_socket).await;
	receive(&mut sending_socket).await;

	send_chat(&mut sending_socket, json!({"type": "chat", "content": "   "})).await;
	let error = match receive(&mut sending_socket).await {
		ServerMessage::Error(error) => error,
		other => panic!("Expected an error message, got {other:?}"),
	};
	assert_eq!("Message content is required", error.message);

	// The next frame the observer sees is the accepted message, proving the
	// rejection was never broadcast.
	send_chat(&mut sending_socket, json!({"type": "chat", "content": "ping"})).await;
	match receive(&mut observing_socket).await {
		ServerMessage::Chat(broadcast) => assert_eq!("ping", broadcast.content),
		other => panic!("Expected a chat broadcast, got {other:?}"),
	}
	match receive(&mut sending_socket).await {
		ServerMessage::Chat(broadcast) => assert_eq!("ping", broadcast.content),
		other => panic!("Expected a chat broadcast, got {other:?}"),
	}
}

async fn create_room(client: &TestClient, name: &str) -> RoomResponse {
	client
		.post("/api/rooms")
		.json(&CreateRoomRequest { name: name.to_string() })
		.send()
		.await
		.expect("Failed to send room creation request")
		.json()
		.await
		.expect("Failed to deserialize room response")
}

async fn history_page(client: &TestClient, room_id: &str, query: &str) -> MessagePage {
	client
		.get(&format!("/api/rooms/{room_id}/messages?{query}"))
		.send()
		.await
		.expect("Failed to send history request")
		.json()
		.await
		.expect("Failed to deserialize history page")
}

async fn connect(client: &TestClient, room_id: &str) -> WebSocketClient {
	let (websocket, _response) = connect_async(client.websocket_url(&format!("ws/rooms/{room_id}")))
		.await
		.expect("Failed to connect websocket");
	websocket
}

async fn send_chat(websocket: &mut WebSocketClient, request: serde_json::Value) {
	websocket
		.send(tungstenite::Message::Text(request.to_string().into()))
		.await
		.expect("Failed to send chat request");
}

async fn receive(websocket: &mut WebSocketClient) -> ServerMessage {
	let next_text_message = async {
		loop {
			let message = websocket
				.next()
				.await
				.expect("Websocket closed unexpectedly")
				.expect("Websocket errored");
			if let tungstenite::Message::Text(text) = message {
				return serde_json::from_str(text.as_str()).expect("Failed to deserialize server message");
			}
		}
	};

	tokio::time::timeout(Duration::from_secs(10), next_text_message)
		.await
		.expect("Timed out waiting for a server message")
}
