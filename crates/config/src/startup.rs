//! Logging initialization at process startup

use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LoggingSettings};

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` overrides the configured level when set. Call once; a second
/// call would panic setting the global default.
pub fn init_logging(settings: &LoggingSettings) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

	match settings.format {
		LogFormat::Json => {
			tracing_subscriber::fmt()
				.with_env_filter(filter)
				.json()
				.init();
		},
		LogFormat::Pretty => {
			tracing_subscriber::fmt().with_env_filter(filter).init();
		},
	}
}
