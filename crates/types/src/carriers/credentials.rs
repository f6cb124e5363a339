//! Carrier authentication credentials
//!
//! Each carrier defines its own auth mode; secrets are `SecretString` so
//! they never leak through `Debug` output or logs.

use serde::{Deserialize, Serialize};

use crate::models::SecretString;

/// Credential material for one carrier, supplied per attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CarrierCredentials {
	/// No credentials; some sandbox environments are open
	None,

	/// Static API key sent in a carrier-named header
	ApiKey { header: String, key: SecretString },

	/// HTTP basic auth pair
	Basic {
		username: String,
		password: SecretString,
	},

	/// OAuth2 client-credential pair exchanged for a bearer token before the
	/// quote call
	OAuth2 {
		client_id: String,
		client_secret: SecretString,
		/// Token endpoint path relative to the carrier host
		token_path: String,
		scope: Option<String>,
	},
}

impl CarrierCredentials {
	pub fn api_key(header: &str, key: &str) -> Self {
		Self::ApiKey {
			header: header.to_string(),
			key: SecretString::from_string(key),
		}
	}

	pub fn basic(username: &str, password: &str) -> Self {
		Self::Basic {
			username: username.to_string(),
			password: SecretString::from_string(password),
		}
	}

	pub fn oauth2(client_id: &str, client_secret: &str, token_path: &str) -> Self {
		Self::OAuth2 {
			client_id: client_id.to_string(),
			client_secret: SecretString::from_string(client_secret),
			token_path: token_path.to_string(),
			scope: None,
		}
	}
}
