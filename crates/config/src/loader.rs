//! Layered configuration loading
//!
//! A base file, an optional environment-specific overlay and
//! `QUOTEWIRE__`-prefixed environment variables, later sources overriding
//! earlier ones.

use config::{Config, Environment, File};
use tracing::info;

use crate::{ConfigError, Settings};

const ENV_PREFIX: &str = "QUOTEWIRE";
const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Load settings from the default locations
pub fn load() -> Result<Settings, ConfigError> {
	load_from(DEFAULT_CONFIG_PATH)
}

/// Load settings from an explicit base path (without extension)
///
/// `QUOTEWIRE__CARRIERS__ACUITY_WC__ENABLED=false` style variables override
/// file values; the double underscore separates nesting levels.
pub fn load_from(base_path: &str) -> Result<Settings, ConfigError> {
	let builder = Config::builder()
		.add_source(File::with_name(base_path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.separator("__")
				.try_parsing(true),
		);

	let settings: Settings = builder.build()?.try_deserialize()?;
	info!(
		"Loaded configuration: {} carriers, environment {:?}",
		settings.carriers.len(),
		settings.environment
	);
	Ok(settings)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_environment_only_configuration() {
		// No file at this path; environment must carry required fields.
		std::env::set_var("QUOTEWIRE__ENVIRONMENT", "sandbox");
		let settings = load_from("config/does-not-exist").unwrap();
		assert_eq!(settings.environment, qwire_types::Environment::Sandbox);
		assert!(settings.carriers.is_empty());
		std::env::remove_var("QUOTEWIRE__ENVIRONMENT");
	}
}
