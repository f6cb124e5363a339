//! Structured-markup sender for ACORD-style carrier endpoints
//!
//! Documents are typed serde structures serialized with quick-xml; responses
//! are decoded into typed per-carrier schemas rather than navigated by
//! dotted path.

use qwire_types::{AdapterError, AdapterResult, CarrierRuntimeConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::{HttpTransport, WireAuth, WireBody, WireMethod, WireRequest, WireResponse};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Sender for markup request/response carriers
#[derive(Debug, Clone)]
pub struct MarkupSender {
	transport: Arc<dyn HttpTransport>,
}

impl MarkupSender {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self { transport }
	}

	/// Serialize a typed document and POST it to the carrier endpoint
	pub async fn post<Req>(
		&self,
		config: &CarrierRuntimeConfig,
		auth: WireAuth,
		document: &Req,
	) -> AdapterResult<WireResponse>
	where
		Req: Serialize,
	{
		let body = encode(document)?;
		debug!(
			"Posting {} byte markup document to {} (carrier: {})",
			body.len(),
			config.endpoint,
			config.carrier_id
		);

		let mut headers = Vec::new();
		if let Some(custom) = &config.headers {
			for (name, value) in custom {
				headers.push((name.clone(), value.clone()));
			}
		}

		self.transport
			.execute(WireRequest {
				method: WireMethod::Post,
				url: config.endpoint.clone(),
				headers,
				auth,
				body: WireBody::Markup(body),
				timeout_ms: config.timeout_ms,
			})
			.await
	}
}

/// Serialize a typed document with the standard declaration prepended
pub fn encode<T: Serialize>(document: &T) -> AdapterResult<String> {
	let body = quick_xml::se::to_string(document)
		.map_err(|e| AdapterError::Markup(format!("failed to serialize request document: {}", e)))?;
	Ok(format!("{}{}", XML_DECLARATION, body))
}

/// Decode a carrier markup body into a typed response schema
pub fn decode<T: DeserializeOwned>(body: &str) -> AdapterResult<T> {
	quick_xml::de::from_str(body).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("failed to parse carrier markup response: {}", e),
	})
}
