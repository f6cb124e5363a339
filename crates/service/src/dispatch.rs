//! Concurrent fan-out of one application across configured carriers
//!
//! Each attempt runs in its own task under its own deadline; one slow or
//! failing carrier never delays or sinks the others. Every attempt resolves
//! to an `AttemptResult`, so the caller always gets exactly one outcome per
//! enabled carrier.

use futures::future::join_all;
use qwire_adapters::AdapterRegistry;
use qwire_types::{
	ApplicationSnapshot, Carrier, CarrierCredentials, CarrierRuntimeConfig, CodeMappingSet,
	Environment, QuestionCatalogEntry, QuoteContext, QuoteOutcome,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Slack added on top of a carrier's own transport timeout before the
/// dispatcher gives up on the task
const DISPATCH_TIMEOUT_MARGIN_MS: u64 = 2_000;

/// One carrier attempt to dispatch: the carrier record plus everything the
/// adapter needs beyond the snapshot
#[derive(Debug, Clone)]
pub struct AttemptSpec {
	pub carrier: Carrier,
	pub credentials: CarrierCredentials,
	pub code_mappings: CodeMappingSet,
	pub questions: Vec<QuestionCatalogEntry>,
}

impl AttemptSpec {
	pub fn new(carrier: Carrier, credentials: CarrierCredentials) -> Self {
		Self {
			carrier,
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

/// The outcome of one dispatched carrier attempt
#[derive(Debug, Clone)]
pub struct AttemptResult {
	pub carrier_id: String,
	pub adapter_id: String,
	pub outcome: QuoteOutcome,
	pub duration_ms: u64,
}

/// Fans one application out across carriers through the adapter registry
#[derive(Debug, Clone)]
pub struct QuoteDispatcher {
	registry: Arc<AdapterRegistry>,
	environment: Environment,
}

impl QuoteDispatcher {
	pub fn new(registry: Arc<AdapterRegistry>, environment: Environment) -> Self {
		Self {
			registry,
			environment,
		}
	}

	/// Check that every enabled attempt references a registered adapter
	///
	/// Run at startup so a configuration typo surfaces before the first
	/// application is quoted.
	pub fn validate_carriers<'a, I>(&self, carriers: I) -> Result<(), Vec<String>>
	where
		I: IntoIterator<Item = &'a Carrier>,
	{
		let unknown: Vec<String> = carriers
			.into_iter()
			.filter(|carrier| carrier.enabled && !self.registry.contains(&carrier.adapter_id))
			.map(|carrier| {
				format!(
					"carrier '{}' references unknown adapter '{}'",
					carrier.carrier_id, carrier.adapter_id
				)
			})
			.collect();

		if unknown.is_empty() {
			Ok(())
		} else {
			Err(unknown)
		}
	}

	/// Quote one application against every enabled carrier concurrently
	///
	/// Disabled carriers are skipped entirely. Results come back in
	/// completion-independent order, one per attempted carrier.
	pub async fn dispatch(
		&self,
		snapshot: Arc<ApplicationSnapshot>,
		attempts: Vec<AttemptSpec>,
	) -> Vec<AttemptResult> {
		let enabled: Vec<AttemptSpec> = attempts
			.into_iter()
			.filter(|attempt| {
				if !attempt.carrier.enabled {
					debug!(
						"Skipping disabled carrier: {}",
						attempt.carrier.carrier_id
					);
				}
				attempt.carrier.enabled
			})
			.collect();

		info!(
			"Dispatching application {} to {} carriers",
			snapshot.application_id,
			enabled.len()
		);

		let tasks = enabled.into_iter().map(|attempt| {
			let dispatcher = self.clone();
			let snapshot = snapshot.clone();
			tokio::spawn(async move { dispatcher.attempt(&snapshot, attempt).await })
		});

		let mut results = Vec::new();
		for joined in join_all(tasks).await {
			match joined {
				Ok(result) => results.push(result),
				// A panicking adapter loses its attempt but not the batch.
				Err(join_error) => warn!("Carrier attempt task failed: {}", join_error),
			}
		}
		results
	}

	async fn attempt(&self, snapshot: &ApplicationSnapshot, attempt: AttemptSpec) -> AttemptResult {
		let carrier_id = attempt.carrier.carrier_id.clone();
		let adapter_id = attempt.carrier.adapter_id.clone();
		let started = Instant::now();

		let outcome = self.attempt_outcome(snapshot, attempt).await;
		let duration_ms = started.elapsed().as_millis() as u64;

		debug!(
			"Carrier {} finished with status {:?} in {}ms",
			carrier_id, outcome.status, duration_ms
		);

		AttemptResult {
			carrier_id,
			adapter_id,
			outcome,
			duration_ms,
		}
	}

	async fn attempt_outcome(
		&self,
		snapshot: &ApplicationSnapshot,
		attempt: AttemptSpec,
	) -> QuoteOutcome {
		let adapter = match self.registry.get(&attempt.carrier.adapter_id) {
			Ok(adapter) => adapter,
			Err(fault) => {
				warn!(
					"Carrier {} references unknown adapter {}: {}",
					attempt.carrier.carrier_id, attempt.carrier.adapter_id, fault
				);
				return QuoteOutcome::error(format!(
					"carrier '{}' is misconfigured",
					attempt.carrier.carrier_id
				));
			},
		};

		// Requirements short-circuit: an adapter that needs code mappings is
		// never invoked without them; its pre-checks would only fail later,
		// after request-building work.
		let requirements = adapter.requirements();
		if (requirements.needs_activity_codes || requirements.needs_industry_code)
			&& attempt.code_mappings.is_empty()
		{
			debug!(
				"Carrier {} requires code mappings and none were supplied",
				attempt.carrier.carrier_id
			);
			return QuoteOutcome::autodeclined(vec![
				"carrier requires code mappings and none were supplied".to_string(),
			]);
		}

		let ctx = QuoteContext::new(
			CarrierRuntimeConfig::resolve(&attempt.carrier, self.environment),
			attempt.credentials,
		)
		.with_code_mappings(attempt.code_mappings)
		.with_questions(attempt.questions);

		let deadline =
			Duration::from_millis(attempt.carrier.timeout_ms + DISPATCH_TIMEOUT_MARGIN_MS);
		match tokio::time::timeout(deadline, adapter.quote(snapshot, &ctx)).await {
			Ok(outcome) => outcome,
			Err(_) => {
				warn!(
					"Carrier {} exceeded the dispatch deadline of {:?}",
					attempt.carrier.carrier_id, deadline
				);
				QuoteOutcome::error(format!(
					"carrier attempt exceeded the {}ms dispatch deadline",
					deadline.as_millis()
				))
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use qwire_types::{CarrierEndpoints, PolicyType};

	fn carrier(carrier_id: &str, adapter_id: &str, enabled: bool) -> Carrier {
		Carrier {
			carrier_id: carrier_id.to_string(),
			adapter_id: adapter_id.to_string(),
			policy_type: PolicyType::WorkersCompensation,
			endpoints: CarrierEndpoints {
				sandbox_host: "https://sandbox.example.com".to_string(),
				sandbox_path: "/quote".to_string(),
				production_host: "https://api.example.com".to_string(),
				production_path: "/quote".to_string(),
			},
			timeout_ms: 5_000,
			enabled,
			headers: None,
			name: None,
			description: None,
		}
	}

	#[test]
	fn test_validate_carriers_flags_unknown_adapters() {
		let registry = Arc::new(AdapterRegistry::new());
		let dispatcher = QuoteDispatcher::new(registry, Environment::Sandbox);

		let carriers = vec![
			carrier("acuity-wc", "acuity-wc-v1", true),
			carrier("old-carrier", "retired-v0", false),
		];
		let errors = dispatcher.validate_carriers(&carriers).unwrap_err();

		// Only the enabled carrier is an error; disabled ones may reference
		// retired adapters.
		assert_eq!(errors.len(), 1);
		assert!(errors[0].contains("acuity-wc"));
	}
}
