use crate::commandline::Commandline;
use crate::error::PalaverError;
use clap::Parser;

mod chat;
mod commandline;
mod configuration;
mod context;
mod error;
mod history;
mod message;
mod room;
mod server;
#[cfg(test)]
mod server_tests;
mod store;
mod transport;
mod utils;

#[tokio::main]
async fn main() -> Result<(), PalaverError> {
	let commandline = Commandline::try_parse()?;
	commandline.run().await
}
