use crate::configuration::ConfigurationError;
use crate::store::error::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PalaverError {
	#[error("Failed to load configuration: {0}")]
	Configuration(#[from] ConfigurationError),
	#[error("Failed to parse commandline: {0}")]
	Commandline(#[from] clap::Error),
	#[error("Failed to open the store: {0}")]
	Store(#[from] StoreError),
	#[error("IO error while serving requests: {0}")]
	Server(#[from] std::io::Error),
}
