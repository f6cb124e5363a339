//! JSON sender for bespoke carrier APIs
//!
//! POST/GET with bearer, basic or API-key auth, plus the OAuth2
//! client-credential exchange some carriers require before quoting. Tokens
//! are cached per carrier and refreshed inside a 60-second expiry window.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use qwire_types::{AdapterError, AdapterResult, CarrierRuntimeConfig, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::{
	host_of, join_url, HttpTransport, WireAuth, WireBody, WireMethod, WireRequest, WireResponse,
};

/// Sender for JSON request/response carriers
#[derive(Debug, Clone)]
pub struct JsonSender {
	transport: Arc<dyn HttpTransport>,
}

impl JsonSender {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self { transport }
	}

	/// Serialize a payload and POST it to a URL
	pub async fn post<Req>(
		&self,
		config: &CarrierRuntimeConfig,
		url: &str,
		auth: WireAuth,
		payload: &Req,
	) -> AdapterResult<WireResponse>
	where
		Req: Serialize,
	{
		let value = serde_json::to_value(payload)?;
		debug!(
			"Posting JSON payload to {} (carrier: {})",
			url, config.carrier_id
		);
		self.transport
			.execute(WireRequest {
				method: WireMethod::Post,
				url: url.to_string(),
				headers: self.headers(config),
				auth,
				body: WireBody::Json(value),
				timeout_ms: config.timeout_ms,
			})
			.await
	}

	/// GET a URL with the given auth
	pub async fn get(
		&self,
		config: &CarrierRuntimeConfig,
		url: &str,
		auth: WireAuth,
	) -> AdapterResult<WireResponse> {
		self.transport
			.execute(WireRequest {
				method: WireMethod::Get,
				url: url.to_string(),
				headers: self.headers(config),
				auth,
				body: WireBody::Empty,
				timeout_ms: config.timeout_ms,
			})
			.await
	}

	fn headers(&self, config: &CarrierRuntimeConfig) -> Vec<(String, String)> {
		let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
		if let Some(custom) = &config.headers {
			for (name, value) in custom {
				headers.push((name.clone(), value.clone()));
			}
		}
		headers
	}

	/// Exchange an OAuth2 client-credential pair for a bearer token
	///
	/// The token endpoint lives on the carrier host, at `token_path`. This is
	/// an authentication call, not a quote submission; the at-most-one
	/// submission invariant is unaffected.
	pub async fn oauth2_token(
		&self,
		config: &CarrierRuntimeConfig,
		client_id: &str,
		client_secret: &SecretString,
		token_path: &str,
		scope: Option<&str>,
	) -> AdapterResult<BearerToken> {
		let token_url = join_url(&host_of(&config.endpoint)?, token_path)?;
		debug!(
			"Requesting OAuth2 token from {} for carrier {}",
			token_url, config.carrier_id
		);

		let mut fields = vec![
			("grant_type".to_string(), "client_credentials".to_string()),
			("client_id".to_string(), client_id.to_string()),
			(
				"client_secret".to_string(),
				client_secret.expose_secret().to_string(),
			),
		];
		if let Some(scope) = scope {
			fields.push(("scope".to_string(), scope.to_string()));
		}

		let response = self
			.transport
			.execute(WireRequest {
				method: WireMethod::Post,
				url: token_url,
				headers: Vec::new(),
				auth: WireAuth::None,
				body: WireBody::Form(fields),
				timeout_ms: config.timeout_ms,
			})
			.await?;

		if !response.is_success() {
			return Err(AdapterError::AuthenticationFailed {
				carrier_id: config.carrier_id.clone(),
			});
		}

		let token_response: TokenResponse = decode(&response.body)?;
		let expires_at = token_response
			.expires_in
			.map(|seconds| Utc::now() + chrono::Duration::seconds(seconds));

		info!(
			"Obtained OAuth2 token for carrier {} (expires: {:?})",
			config.carrier_id, expires_at
		);

		Ok(BearerToken {
			token: token_response.access_token,
			expires_at,
		})
	}
}

/// Decode a carrier JSON body into a typed response schema
pub fn decode<T: DeserializeOwned>(body: &str) -> AdapterResult<T> {
	serde_json::from_str(body).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("failed to parse carrier JSON response: {}", e),
	})
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: SecretString,
	#[allow(dead_code)]
	token_type: Option<String>,
	expires_in: Option<i64>,
}

/// A bearer token obtained from a carrier token endpoint
#[derive(Debug, Clone)]
pub struct BearerToken {
	pub token: SecretString,
	pub expires_at: Option<DateTime<Utc>>,
}

impl BearerToken {
	/// Valid unless it expires within the next 60 seconds
	pub fn is_valid(&self) -> bool {
		match self.expires_at {
			Some(expires_at) => Utc::now() < expires_at - chrono::Duration::seconds(60),
			None => true,
		}
	}
}

/// Per-carrier bearer token cache
///
/// Shared by all attempts running through one adapter instance; entries are
/// keyed by carrier id so sandbox and production tokens never mix.
#[derive(Debug, Default)]
pub struct TokenCache {
	tokens: DashMap<String, BearerToken>,
}

impl TokenCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// A still-valid cached token for the carrier, if any
	pub fn valid_token(&self, carrier_id: &str) -> Option<SecretString> {
		self.tokens
			.get(carrier_id)
			.filter(|token| token.is_valid())
			.map(|token| token.token.clone())
	}

	pub fn store(&self, carrier_id: &str, token: BearerToken) {
		self.tokens.insert(carrier_id.to_string(), token);
	}
}
