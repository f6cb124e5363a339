//! Quotewire Adapters
//!
//! Carrier adapter implementations and the shared machinery they are built
//! from: the outbound transport with its JSON and markup senders, business
//! pre-checks, fault classification and the adapter registry the dispatch
//! service resolves carriers against.

pub mod classify;
pub mod prechecks;
pub mod transport;

pub mod acuity_wc;
pub mod amtrust_bop;
pub mod liberty_wc;
pub mod pie_wc;

pub use acuity_wc::AcuityWcAdapter;
pub use amtrust_bop::AmTrustBopAdapter;
pub use liberty_wc::LibertyWcAdapter;
pub use pie_wc::PieWcAdapter;
pub use transport::{HttpTransport, JsonSender, MarkupSender, ReqwestTransport};

use qwire_types::{AdapterError, AdapterResult, QuoteAdapter};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of adapter implementations keyed by adapter id
///
/// Carriers reference adapters by id in configuration; the dispatcher
/// resolves each enabled carrier to its adapter here at attempt time.
pub struct AdapterRegistry {
	adapters: HashMap<String, Arc<dyn QuoteAdapter>>,
}

impl AdapterRegistry {
	/// Empty registry; register adapters explicitly
	pub fn new() -> Self {
		Self {
			adapters: HashMap::new(),
		}
	}

	/// Registry with every built-in adapter, sharing one transport
	pub fn with_defaults(transport: Arc<dyn HttpTransport>) -> Self {
		let mut registry = Self::new();
		registry.register(Arc::new(AcuityWcAdapter::new(transport.clone())));
		registry.register(Arc::new(LibertyWcAdapter::new(transport.clone())));
		registry.register(Arc::new(PieWcAdapter::new(transport.clone())));
		registry.register(Arc::new(AmTrustBopAdapter::new(transport)));
		info!(
			"Adapter registry initialized with {} adapters",
			registry.adapters.len()
		);
		registry
	}

	pub fn register(&mut self, adapter: Arc<dyn QuoteAdapter>) {
		debug!("Registering adapter: {}", adapter.id());
		self.adapters.insert(adapter.id().to_string(), adapter);
	}

	/// Resolve an adapter by id
	pub fn get(&self, adapter_id: &str) -> AdapterResult<Arc<dyn QuoteAdapter>> {
		self.adapters
			.get(adapter_id)
			.cloned()
			.ok_or_else(|| AdapterError::UnsupportedAdapter(adapter_id.to_string()))
	}

	pub fn contains(&self, adapter_id: &str) -> bool {
		self.adapters.contains_key(adapter_id)
	}

	pub fn get_all(&self) -> Vec<Arc<dyn QuoteAdapter>> {
		self.adapters.values().cloned().collect()
	}

	pub fn adapter_ids(&self) -> Vec<&str> {
		self.adapters.keys().map(|id| id.as_str()).collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

impl Default for AdapterRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for AdapterRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdapterRegistry")
			.field("adapters", &self.adapter_ids())
			.finish()
	}
}
