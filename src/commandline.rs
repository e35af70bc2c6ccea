use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::error::PalaverError;
use crate::server::run_server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
pub struct Commandline {
	#[clap(short = 'c', long = "config-file", default_value = "configuration.toml")]
	pub configuration_file_path: String,
	#[clap(subcommand)]
	pub command: Option<BaseCommand>,
}

#[derive(clap::Subcommand)]
pub enum BaseCommand {
	/// Run the palaver chat relay
	Run,
	/// Print the configuration
	Configuration,
}

impl Default for BaseCommand {
	fn default() -> Self {
		Self::Run
	}
}

impl Commandline {
	pub async fn run(self) -> Result<(), PalaverError> {
		let configuration = Configuration::from_file(&self.configuration_file_path)?;

		tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::new(&configuration.log_filters))
			.init();

		match self.command.unwrap_or_default() {
			BaseCommand::Run => {
				let address = configuration.address;
				let application_context = ApplicationContext::new(configuration).await?;
				info!("Starting server on http://{address}. Websocket connections at 'ws://{address}/ws/rooms/{{room_id}}'.");
				run_server(application_context).await?;
			}
			BaseCommand::Configuration => println!("{configuration:?}"),
		}
		Ok(())
	}
}
