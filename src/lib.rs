//! Quotewire
//!
//! Insurer quote integration framework: one application snapshot in,
//! canonical per-carrier quote outcomes out. Carrier adapters translate the
//! snapshot into each carrier's wire format, run business pre-checks and
//! limit negotiation before any network call, and map every carrier
//! vocabulary back onto one outcome taxonomy. The dispatcher fans a snapshot
//! out across every enabled carrier concurrently.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use quotewire::adapters::{AdapterRegistry, ReqwestTransport};
//! use quotewire::service::{AttemptSpec, QuoteDispatcher};
//! use quotewire::types::Environment;
//!
//! # async fn run(snapshot: Arc<quotewire::types::ApplicationSnapshot>, attempts: Vec<AttemptSpec>) {
//! let registry = Arc::new(AdapterRegistry::with_defaults(Arc::new(
//! 	ReqwestTransport::new(),
//! )));
//! let dispatcher = QuoteDispatcher::new(registry, Environment::Sandbox);
//! let results = dispatcher.dispatch(snapshot, attempts).await;
//! for result in results {
//! 	println!("{}: {:?}", result.carrier_id, result.outcome.status);
//! }
//! # }
//! ```

pub mod mocks;

pub use qwire_adapters as adapters;
pub use qwire_config as config;
pub use qwire_service as service;
pub use qwire_types as types;

pub use qwire_config::init_logging;

pub use qwire_adapters::{AdapterRegistry, ReqwestTransport};
pub use qwire_service::{AttemptResult, AttemptSpec, QuoteDispatcher};
pub use qwire_types::{
	ApplicationSnapshot, Carrier, CarrierCredentials, Environment, QuoteAdapter, QuoteContext,
	QuoteOutcome, QuoteStatus,
};
