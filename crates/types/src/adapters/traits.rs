//! The adapter contract every carrier integration implements

use async_trait::async_trait;
use std::fmt::Debug;

use super::{Adapter, AdapterError, AdapterRequirements, AdapterResult};
use crate::application::ApplicationSnapshot;
use crate::carriers::QuoteContext;
use crate::outcomes::{PricingOutcome, QuoteOutcome};

/// Contract for one carrier x policy-type integration
///
/// An implementation is scoped to a single (application, carrier, policy
/// type) attempt at call time and holds no mutable state shared across
/// attempts; dozens of adapters run concurrently against one application.
///
/// Contract obligations: business pre-checks and limit negotiation happen
/// before any network call; question resolution feeds the carrier request;
/// carrier error vocabularies are translated into the canonical taxonomy;
/// the snapshot is never mutated; at most one quote submission goes to the
/// carrier per invocation.
#[async_trait]
pub trait QuoteAdapter: Send + Sync + Debug {
	/// Adapter identity and version
	fn adapter_info(&self) -> &Adapter;

	/// Adapter id, used for registration and carrier matching
	fn id(&self) -> &str {
		&self.adapter_info().adapter_id
	}

	/// Human-readable adapter name
	fn name(&self) -> &str {
		&self.adapter_info().name
	}

	/// Declared requirements, consulted by the dispatcher before an attempt
	fn requirements(&self) -> AdapterRequirements {
		AdapterRequirements::default()
	}

	/// Quote one application against this carrier
	///
	/// Always resolves to a `QuoteOutcome`; transport and parsing faults are
	/// classified internally and never propagate to the caller.
	async fn quote(&self, snapshot: &ApplicationSnapshot, ctx: &QuoteContext) -> QuoteOutcome;

	/// Lighter-weight indicative pricing, for carriers that support
	/// pre-qualification distinct from full quoting
	///
	/// Default implementation reports the operation as unsupported.
	async fn price(
		&self,
		_snapshot: &ApplicationSnapshot,
		_ctx: &QuoteContext,
	) -> AdapterResult<PricingOutcome> {
		Err(AdapterError::UnsupportedOperation {
			operation: "price".to_string(),
			adapter_id: self.id().to_string(),
		})
	}
}
