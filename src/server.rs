use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

pub mod rest_api;
pub mod websocket;

pub async fn run_server(application_context: ApplicationContext) -> Result<(), std::io::Error> {
	let address = application_context.configuration.address;
	let router = create_router(application_context);

	axum_server::bind(address).serve(router.into_make_service()).await
}

pub fn create_router(application_context: ApplicationContext) -> Router {
	Router::new()
		.nest("/api", rest_api::router())
		.route("/ws/rooms/{room_id}", get(websocket::room_websocket))
		.layer(cors_layer(&application_context.configuration))
		.with_state(application_context)
}

fn cors_layer(configuration: &Configuration) -> CorsLayer {
	let origins: Vec<HeaderValue> = configuration
		.allowed_origins
		.iter()
		.filter_map(|origin| match origin.parse() {
			Ok(origin) => Some(origin),
			Err(_) => {
				warn!("Ignoring invalid allowed origin '{origin}'");
				None
			}
		})
		.collect();

	CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([CONTENT_TYPE])
}
