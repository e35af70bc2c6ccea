use crate::chat::MessagePipeline;
use crate::configuration::Configuration;
use crate::history::HistoryService;
use crate::room::RoomManager;
use crate::store::Store;
use crate::store::error::StoreError;
use crate::store::sqlite::SqliteStore;
use crate::transport::{BroadcastTransport, Transport};
use crate::utils::clock::Clock;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct ApplicationContext {
	pub configuration: Configuration,
	pub room_manager: RoomManager,
	pub message_pipeline: MessagePipeline,
	pub history_service: HistoryService,
	pub transport: Arc<dyn Transport>,
}

impl ApplicationContext {
	pub async fn new(configuration: Configuration) -> Result<ApplicationContext, StoreError> {
		let store = Arc::new(SqliteStore::new(&configuration.database_url).await?);

		Ok(Self::with_collaborators(configuration, store, Clock::default()))
	}

	/// Wires the services around explicit collaborators; tests inject their
	/// own store and clock here.
	pub fn with_collaborators(
		configuration: Configuration,
		store: Arc<dyn Store>,
		clock: Clock,
	) -> ApplicationContext {
		let transport: Arc<dyn Transport> = Arc::new(BroadcastTransport::new(configuration.broadcast_capacity));

		ApplicationContext {
			room_manager: RoomManager::new(store.clone()),
			message_pipeline: MessagePipeline::new(store.clone(), transport.clone(), clock),
			history_service: HistoryService::new(store),
			transport,
			configuration,
		}
	}
}
