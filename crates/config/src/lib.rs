//! Quotewire Config
//!
//! Layered configuration for the quote integration framework: a settings
//! schema with environment-variable secret indirection, a loader combining
//! file and environment sources, and logging startup.

pub mod loader;
pub mod settings;
pub mod startup;

pub use loader::{load, load_from};
pub use settings::{CarrierSettings, CredentialSettings, LogFormat, LoggingSettings, Settings};
pub use startup::init_logging;

use thiserror::Error;

/// Errors raised while loading or resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("configuration error: {0}")]
	Source(#[from] config::ConfigError),

	#[error("carrier '{carrier_id}' requires environment variable '{variable}' which is not set")]
	MissingSecret {
		carrier_id: String,
		variable: String,
	},
}
