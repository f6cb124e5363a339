//! Carrier configuration, credentials and per-attempt runtime context

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod credentials;

pub use credentials::CarrierCredentials;

use crate::application::PolicyType;
use crate::codes::CodeMappingSet;
use crate::questions::QuestionCatalogEntry;

/// Deployment environment selecting the carrier host to call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	Sandbox,
	Production,
}

/// Sandbox and production host/path pairs for one carrier
///
/// Resolved once at attempt start from an explicit environment parameter;
/// adapters never consult global environment state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarrierEndpoints {
	pub sandbox_host: String,
	pub sandbox_path: String,
	pub production_host: String,
	pub production_path: String,
}

impl CarrierEndpoints {
	/// Full endpoint URL for the given environment
	pub fn resolve(&self, environment: Environment) -> String {
		let (host, path) = match environment {
			Environment::Sandbox => (&self.sandbox_host, &self.sandbox_path),
			Environment::Production => (&self.production_host, &self.production_path),
		};
		format!("{}{}", host.trim_end_matches('/'), path)
	}
}

/// One configured carrier integration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Carrier {
	/// Unique carrier instance identifier
	pub carrier_id: String,

	/// Adapter implementation this carrier is quoted through
	pub adapter_id: String,

	pub policy_type: PolicyType,

	pub endpoints: CarrierEndpoints,

	/// Per-request timeout in milliseconds
	pub timeout_ms: u64,

	pub enabled: bool,

	/// Optional custom HTTP headers for requests
	pub headers: Option<HashMap<String, String>>,

	pub name: Option<String>,
	pub description: Option<String>,
}

/// Minimal runtime configuration an adapter needs for one attempt
///
/// Carries only the resolved endpoint and transport settings, keeping the
/// full `Carrier` record (and its aggregator-side metadata) out of adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierRuntimeConfig {
	pub carrier_id: String,

	/// Fully resolved endpoint URL for the active environment
	pub endpoint: String,

	pub timeout_ms: u64,

	pub headers: Option<HashMap<String, String>>,
}

impl CarrierRuntimeConfig {
	pub fn new(carrier_id: String, endpoint: String, timeout_ms: u64) -> Self {
		Self {
			carrier_id,
			endpoint,
			timeout_ms,
			headers: None,
		}
	}

	pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
		self.headers = Some(headers);
		self
	}

	/// Build runtime config for a carrier in the given environment
	pub fn resolve(carrier: &Carrier, environment: Environment) -> Self {
		Self {
			carrier_id: carrier.carrier_id.clone(),
			endpoint: carrier.endpoints.resolve(environment),
			timeout_ms: carrier.timeout_ms,
			headers: carrier.headers.clone(),
		}
	}
}

/// Everything an adapter needs for a single quote attempt beyond the snapshot
///
/// Constructed fresh per (application, carrier, policy type) attempt and
/// discarded with the outcome. All lookups inside are immutable for the
/// attempt's lifetime.
#[derive(Debug, Clone)]
pub struct QuoteContext {
	pub config: CarrierRuntimeConfig,

	pub credentials: CarrierCredentials,

	/// Carrier class/activity code mappings for this attempt
	pub code_mappings: CodeMappingSet,

	/// Question catalog already scoped to this carrier
	pub questions: Vec<QuestionCatalogEntry>,
}

impl QuoteContext {
	pub fn new(config: CarrierRuntimeConfig, credentials: CarrierCredentials) -> Self {
		Self {
			config,
			credentials,
			code_mappings: CodeMappingSet::new(),
			questions: Vec::new(),
		}
	}

	pub fn with_code_mappings(mut self, code_mappings: CodeMappingSet) -> Self {
		self.code_mappings = code_mappings;
		self
	}

	pub fn with_questions(mut self, questions: Vec<QuestionCatalogEntry>) -> Self {
		self.questions = questions;
		self
	}
}
