use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::server::create_router;
use axum::Router;
use reqwest::{Method, RequestBuilder};
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};
use std::time::Duration;

pub struct TestClient {
	server_handle: axum_server::Handle<SocketAddr>,
	client: reqwest::Client,
	server_address: SocketAddr,
}

impl TestClient {
	/// Spawns a server over a fresh in-memory store and returns a client
	/// pointed at it.
	pub async fn start() -> Self {
		let application_context = ApplicationContext::new(test_configuration())
			.await
			.expect("Failed to create application context");

		Self::new(create_router(application_context))
			.await
			.expect("Failed to start test server")
	}

	async fn new(router: Router) -> anyhow::Result<Self> {
		// NOTE: port 0 assigns a random available port
		let socket_address = SocketAddrV6::new(Ipv6Addr::LOCALHOST, 0, 0, 0);

		let (bind_address, handle) = loop {
			let handle = axum_server::Handle::new();
			let server = axum_server::Server::bind(socket_address.into()).handle(handle.clone());

			tokio::spawn(server.serve(router.clone().into_make_service()));

			if let Some(address) = handle.listening().await {
				break (address, handle);
			}
		};

		let client = reqwest::Client::builder()
			.connect_timeout(Duration::from_secs(10))
			.build()?;

		Ok(Self {
			server_handle: handle,
			client,
			server_address: bind_address,
		})
	}

	pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
		let base_address = self.server_address;
		let path = path.trim_start_matches('/');
		self.client.request(method, format!("http://{base_address}/{path}"))
	}

	pub fn get(&self, path: &str) -> RequestBuilder {
		self.request(Method::GET, path)
	}

	pub fn post(&self, path: &str) -> RequestBuilder {
		self.request(Method::POST, path)
	}

	pub fn websocket_url(&self, path: &str) -> String {
		let base_address = self.server_address;
		let path = path.trim_start_matches('/');
		format!("ws://{base_address}/{path}")
	}
}

impl Drop for TestClient {
	fn drop(&mut self) {
		self.server_handle.graceful_shutdown(Some(Duration::from_secs(5)));
	}
}

fn test_configuration() -> Configuration {
	Configuration {
		address: "127.0.0.1:0".parse().expect("Failed to parse test address"),
		log_filters: "info".to_string(),
		database_url: "sqlite::memory:".to_string(),
		broadcast_capacity: 16,
		allowed_origins: Vec::new(),
	}
}
