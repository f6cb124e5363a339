//! Configuration schema
//!
//! Deserialized from file and environment sources by the loader. Secrets are
//! never stored inline; credential settings name environment variables and
//! are resolved to `CarrierCredentials` at startup.

use qwire_types::{Carrier, CarrierCredentials, CarrierEndpoints, Environment, PolicyType};
use serde::Deserialize;
use std::collections::HashMap;

use crate::ConfigError;

const DEFAULT_TIMEOUT_MS: u64 = 20_000;

fn default_timeout_ms() -> u64 {
	DEFAULT_TIMEOUT_MS
}

fn default_enabled() -> bool {
	true
}

fn default_log_level() -> String {
	"info".to_string()
}

/// Top-level application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
	/// Which carrier hosts to call
	pub environment: Environment,

	#[serde(default)]
	pub logging: LoggingSettings,

	/// Configured carriers keyed by carrier id
	#[serde(default)]
	pub carriers: HashMap<String, CarrierSettings>,
}

impl Settings {
	/// Build runtime `Carrier` records, resolving credential indirection
	pub fn carriers(&self) -> Result<Vec<(Carrier, CarrierCredentials)>, ConfigError> {
		let mut carriers = Vec::new();
		for (carrier_id, settings) in &self.carriers {
			let credentials = settings.credentials.resolve(carrier_id)?;
			carriers.push((settings.to_carrier(carrier_id), credentials));
		}
		carriers.sort_by(|(a, _), (b, _)| a.carrier_id.cmp(&b.carrier_id));
		Ok(carriers)
	}
}

/// Logging output settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
	#[serde(default = "default_log_level")]
	pub level: String,

	#[serde(default)]
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			format: LogFormat::default(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

/// One carrier's configuration block
#[derive(Debug, Clone, Deserialize)]
pub struct CarrierSettings {
	pub adapter_id: String,

	pub policy_type: PolicyType,

	pub sandbox_host: String,
	pub sandbox_path: String,
	pub production_host: String,
	pub production_path: String,

	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,

	#[serde(default = "default_enabled")]
	pub enabled: bool,

	#[serde(default)]
	pub headers: Option<HashMap<String, String>>,

	#[serde(default)]
	pub name: Option<String>,

	#[serde(default)]
	pub description: Option<String>,

	#[serde(default)]
	pub credentials: CredentialSettings,
}

impl CarrierSettings {
	pub fn to_carrier(&self, carrier_id: &str) -> Carrier {
		Carrier {
			carrier_id: carrier_id.to_string(),
			adapter_id: self.adapter_id.clone(),
			policy_type: self.policy_type,
			endpoints: CarrierEndpoints {
				sandbox_host: self.sandbox_host.clone(),
				sandbox_path: self.sandbox_path.clone(),
				production_host: self.production_host.clone(),
				production_path: self.production_path.clone(),
			},
			timeout_ms: self.timeout_ms,
			enabled: self.enabled,
			headers: self.headers.clone(),
			name: self.name.clone(),
			description: self.description.clone(),
		}
	}
}

/// Credential configuration with environment-variable indirection
///
/// Config files carry the names of environment variables holding the secret
/// material, never the secrets themselves.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialSettings {
	#[default]
	None,

	ApiKey {
		header: String,
		key_env: String,
	},

	Basic {
		username: String,
		password_env: String,
	},

	Oauth2 {
		client_id: String,
		client_secret_env: String,
		token_path: String,
		#[serde(default)]
		scope: Option<String>,
	},
}

impl CredentialSettings {
	/// Resolve environment indirection into credential material
	pub fn resolve(&self, carrier_id: &str) -> Result<CarrierCredentials, ConfigError> {
		let read = |var: &str| {
			std::env::var(var).map_err(|_| ConfigError::MissingSecret {
				carrier_id: carrier_id.to_string(),
				variable: var.to_string(),
			})
		};

		Ok(match self {
			Self::None => CarrierCredentials::None,
			Self::ApiKey { header, key_env } => {
				CarrierCredentials::api_key(header, &read(key_env)?)
			},
			Self::Basic {
				username,
				password_env,
			} => CarrierCredentials::basic(username, &read(password_env)?),
			Self::Oauth2 {
				client_id,
				client_secret_env,
				token_path,
				scope,
			} => {
				let mut credentials =
					CarrierCredentials::oauth2(client_id, &read(client_secret_env)?, token_path);
				if let CarrierCredentials::OAuth2 {
					scope: credential_scope,
					..
				} = &mut credentials
				{
					*credential_scope = scope.clone();
				}
				credentials
			},
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_carrier_settings_to_carrier() {
		let settings = CarrierSettings {
			adapter_id: "acuity-wc-v1".to_string(),
			policy_type: PolicyType::WorkersCompensation,
			sandbox_host: "https://sandbox.acuity.example.com".to_string(),
			sandbox_path: "/ws/rating".to_string(),
			production_host: "https://www.acuity.example.com".to_string(),
			production_path: "/ws/rating".to_string(),
			timeout_ms: default_timeout_ms(),
			enabled: true,
			headers: None,
			name: Some("Acuity".to_string()),
			description: None,
			credentials: CredentialSettings::None,
		};

		let carrier = settings.to_carrier("acuity-wc");
		assert_eq!(carrier.carrier_id, "acuity-wc");
		assert_eq!(carrier.adapter_id, "acuity-wc-v1");
		assert_eq!(carrier.timeout_ms, 20_000);
		assert!(carrier.enabled);
	}

	#[test]
	fn test_missing_secret_variable_is_an_error() {
		let settings = CredentialSettings::ApiKey {
			header: "X-Api-Key".to_string(),
			key_env: "QWIRE_TEST_SURELY_UNSET_VAR".to_string(),
		};
		let err = settings.resolve("amtrust-bop").unwrap_err();
		assert!(matches!(err, ConfigError::MissingSecret { .. }));
	}

	#[test]
	fn test_none_credentials_need_no_environment() {
		let settings = CredentialSettings::None;
		assert_eq!(
			settings.resolve("open-sandbox").unwrap(),
			CarrierCredentials::None
		);
	}
}
