//! Outbound transport shared by all carrier adapters
//!
//! One `HttpTransport` implementation performs the actual network I/O;
//! adapters describe a call as a `WireRequest` and classify the resulting
//! `WireResponse` themselves. Network-level failures (DNS, connect, timeout)
//! are `Err`; any HTTP response, 2xx or not, comes back `Ok` so an adapter
//! can tell "carrier reachable but rejected the call" from "carrier
//! unreachable" and can inspect well-formed carrier error bodies.

use async_trait::async_trait;
use dashmap::DashMap;
use qwire_types::{AdapterError, AdapterResult, CarrierCredentials, SecretString};
use reqwest::Client;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

pub mod json;
pub mod markup;

pub use json::JsonSender;
pub use markup::MarkupSender;

/// HTTP verb for a wire request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireMethod {
	Get,
	Post,
}

/// Authentication applied to one wire request
#[derive(Debug, Clone)]
pub enum WireAuth {
	None,
	Bearer(SecretString),
	Basic {
		username: String,
		password: SecretString,
	},
	Header {
		name: String,
		value: SecretString,
	},
}

impl WireAuth {
	/// Static credential material mapped directly onto a request
	///
	/// OAuth2 pairs need a prior token exchange and resolve to `None` here;
	/// adapters that support them obtain a bearer token first.
	pub fn from_credentials(credentials: &CarrierCredentials) -> Self {
		match credentials {
			CarrierCredentials::None | CarrierCredentials::OAuth2 { .. } => Self::None,
			CarrierCredentials::ApiKey { header, key } => Self::Header {
				name: header.clone(),
				value: key.clone(),
			},
			CarrierCredentials::Basic { username, password } => Self::Basic {
				username: username.clone(),
				password: password.clone(),
			},
		}
	}
}

/// Request body in one of the two wire formats carriers use
#[derive(Debug, Clone)]
pub enum WireBody {
	Empty,
	Json(serde_json::Value),
	Markup(String),
	Form(Vec<(String, String)>),
}

/// One fully described outbound carrier call
#[derive(Debug, Clone)]
pub struct WireRequest {
	pub method: WireMethod,
	pub url: String,
	pub headers: Vec<(String, String)>,
	pub auth: WireAuth,
	pub body: WireBody,
	pub timeout_ms: u64,
}

/// A carrier's HTTP answer, whatever its status
#[derive(Debug, Clone)]
pub struct WireResponse {
	pub status: u16,
	pub body: String,
}

impl WireResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// The single seam between adapters and the network
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
	async fn execute(&self, request: WireRequest) -> AdapterResult<WireResponse>;
}

/// Join a path onto a base URL, treating the base as a directory
pub fn join_url(base_url: &str, path: &str) -> AdapterResult<String> {
	let mut base = Url::parse(base_url).map_err(|e| AdapterError::ConfigError {
		reason: format!("invalid base URL '{}': {}", base_url, e),
	})?;

	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	let joined = base
		.join(path.trim_start_matches('/'))
		.map_err(|e| AdapterError::ConfigError {
			reason: format!("failed to join path '{}' to '{}': {}", path, base_url, e),
		})?;

	Ok(joined.to_string())
}

/// Host portion of a carrier endpoint, for token endpoints and cache keys
pub fn host_of(endpoint: &str) -> AdapterResult<String> {
	let url = Url::parse(endpoint).map_err(|e| AdapterError::ConfigError {
		reason: format!("invalid endpoint URL '{}': {}", endpoint, e),
	})?;
	let host = url.host_str().ok_or_else(|| AdapterError::ConfigError {
		reason: format!("endpoint URL '{}' has no host", endpoint),
	})?;
	match url.port() {
		Some(port) => Ok(format!("{}://{}:{}", url.scheme(), host, port)),
		None => Ok(format!("{}://{}", url.scheme(), host)),
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClientKey {
	host: String,
	timeout_ms: u64,
}

#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Production transport over reqwest with a TTL'd per-host client cache
///
/// Clients are pooled per (host, timeout) so concurrent adapters reuse
/// connections; the per-request timeout always comes from the request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	clients: Arc<DashMap<ClientKey, CachedClient>>,
	ttl: Duration,
}

impl ReqwestTransport {
	/// Default 30-minute client TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	fn client_for(&self, key: ClientKey) -> AdapterResult<Arc<Client>> {
		self.clients.remove_if(&key, |_, cached| {
			let expired = cached.is_expired(self.ttl);
			if expired {
				warn!(
					"Client cache expired for {} (age: {:?}), creating new client",
					key.host,
					cached.created_at.elapsed()
				);
			}
			expired
		});

		if let Some(cached) = self.clients.get(&key) {
			return Ok(cached.client.clone());
		}

		let client = Client::builder()
			.timeout(Duration::from_millis(key.timeout_ms))
			.pool_max_idle_per_host(10)
			.build()
			.map_err(|e| AdapterError::ConfigError {
				reason: format!("failed to build HTTP client: {}", e),
			})?;

		let cached = CachedClient {
			client: Arc::new(client),
			created_at: Instant::now(),
		};
		let client = cached.client.clone();

		use dashmap::mapref::entry::Entry;
		match self.clients.entry(key) {
			Entry::Occupied(entry) => Ok(entry.get().client.clone()),
			Entry::Vacant(entry) => {
				entry.insert(cached);
				Ok(client)
			},
		}
	}
}

impl Default for ReqwestTransport {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
	async fn execute(&self, request: WireRequest) -> AdapterResult<WireResponse> {
		let key = ClientKey {
			host: host_of(&request.url)?,
			timeout_ms: request.timeout_ms,
		};
		let client = self.client_for(key)?;

		let mut builder = match request.method {
			WireMethod::Get => client.get(&request.url),
			WireMethod::Post => client.post(&request.url),
		};

		for (name, value) in &request.headers {
			builder = builder.header(name, value);
		}

		builder = match &request.auth {
			WireAuth::None => builder,
			WireAuth::Bearer(token) => builder.bearer_auth(token.expose_secret()),
			WireAuth::Basic { username, password } => {
				builder.basic_auth(username, Some(password.expose_secret()))
			},
			WireAuth::Header { name, value } => builder.header(name, value.expose_secret()),
		};

		builder = match request.body {
			WireBody::Empty => builder,
			WireBody::Json(value) => builder.json(&value),
			WireBody::Markup(document) => builder
				.header("Content-Type", "text/xml; charset=utf-8")
				.body(document),
			WireBody::Form(fields) => builder.form(&fields),
		};

		let response = builder
			.timeout(Duration::from_millis(request.timeout_ms))
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					AdapterError::Timeout {
						timeout_ms: request.timeout_ms,
					}
				} else if e.is_connect() {
					AdapterError::Connection(e.to_string())
				} else {
					AdapterError::Network(e.to_string())
				}
			})?;

		let status = response.status().as_u16();
		// A response whose body cannot be read is a transport fault, not an
		// empty carrier answer.
		let body = response
			.text()
			.await
			.map_err(|e| AdapterError::Network(format!("failed to read response body: {}", e)))?;
		debug!(
			"Carrier call to {} returned HTTP {} with {} bytes",
			request.url,
			status,
			body.len()
		);

		Ok(WireResponse { status, body })
	}
}
