//! Dispatcher behavior: fan-out, isolation, short-circuits and deadlines

mod mocks;

use mocks::{bakery_snapshot, carrier, wc_mappings};
use quotewire::adapters::AdapterRegistry;
use quotewire::mocks::MockQuoteAdapter;
use quotewire::service::{AttemptSpec, QuoteDispatcher};
use quotewire::types::{
	AdapterRequirements, CarrierCredentials, Environment, QuoteOutcome, QuoteStatus,
};
use rust_decimal_macros::dec;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn dispatcher_with(adapters: Vec<Arc<MockQuoteAdapter>>) -> QuoteDispatcher {
	let mut registry = AdapterRegistry::new();
	for adapter in adapters {
		registry.register(adapter);
	}
	QuoteDispatcher::new(Arc::new(registry), Environment::Sandbox)
}

fn attempt(carrier_id: &str, adapter_id: &str, enabled: bool) -> AttemptSpec {
	AttemptSpec::new(carrier(carrier_id, adapter_id, enabled), CarrierCredentials::None)
		.with_code_mappings(wc_mappings())
}

#[tokio::test]
async fn every_enabled_carrier_gets_exactly_one_result() {
	let quoted = Arc::new(MockQuoteAdapter::new(
		"quoting-v1",
		QuoteOutcome::quoted(dec!(1000)),
	));
	let declining = Arc::new(MockQuoteAdapter::new(
		"declining-v1",
		QuoteOutcome::declined(vec!["outside appetite".to_string()]),
	));
	let dispatcher = dispatcher_with(vec![quoted.clone(), declining.clone()]);

	let results = dispatcher
		.dispatch(
			Arc::new(bakery_snapshot()),
			vec![
				attempt("carrier-a", "quoting-v1", true),
				attempt("carrier-b", "declining-v1", true),
				attempt("carrier-c", "quoting-v1", false),
			],
		)
		.await;

	// The disabled carrier produces no result at all.
	assert_eq!(results.len(), 2);
	let statuses: Vec<(String, QuoteStatus)> = results
		.iter()
		.map(|result| (result.carrier_id.clone(), result.outcome.status))
		.collect();
	assert!(statuses.contains(&("carrier-a".to_string(), QuoteStatus::Quoted)));
	assert!(statuses.contains(&("carrier-b".to_string(), QuoteStatus::Declined)));
}

#[tokio::test]
async fn one_failing_carrier_never_sinks_the_others() {
	let quoting = Arc::new(MockQuoteAdapter::new(
		"quoting-v1",
		QuoteOutcome::quoted(dec!(777)),
	));
	let erroring = Arc::new(MockQuoteAdapter::new(
		"erroring-v1",
		QuoteOutcome::error("carrier unreachable".to_string()),
	));
	let dispatcher = dispatcher_with(vec![quoting, erroring]);

	let results = dispatcher
		.dispatch(
			Arc::new(bakery_snapshot()),
			vec![
				attempt("good", "quoting-v1", true),
				attempt("bad", "erroring-v1", true),
			],
		)
		.await;

	let good = results.iter().find(|r| r.carrier_id == "good").unwrap();
	assert_eq!(good.outcome.status, QuoteStatus::Quoted);
	assert_eq!(good.outcome.premium, Some(dec!(777)));
}

#[tokio::test]
async fn unknown_adapter_yields_error_outcome() {
	let dispatcher = dispatcher_with(vec![]);

	let results = dispatcher
		.dispatch(
			Arc::new(bakery_snapshot()),
			vec![attempt("typo-carrier", "does-not-exist-v1", true)],
		)
		.await;

	assert_eq!(results.len(), 1);
	assert_eq!(results[0].outcome.status, QuoteStatus::Error);
	assert!(results[0].outcome.reasons[0].contains("misconfigured"));
}

#[tokio::test]
async fn missing_required_mappings_short_circuit_before_the_adapter() {
	let adapter = Arc::new(
		MockQuoteAdapter::new("needy-v1", QuoteOutcome::quoted(dec!(1))).with_requirements(
			AdapterRequirements::activity_codes(),
		),
	);
	let dispatcher = dispatcher_with(vec![adapter.clone()]);

	// No code mappings supplied on the attempt.
	let spec = AttemptSpec::new(
		carrier("needy-carrier", "needy-v1", true),
		CarrierCredentials::None,
	);
	let results = dispatcher
		.dispatch(Arc::new(bakery_snapshot()), vec![spec])
		.await;

	assert_eq!(results[0].outcome.status, QuoteStatus::Autodeclined);
	assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn adapter_exceeding_the_dispatch_deadline_yields_error() {
	let stuck = Arc::new(
		MockQuoteAdapter::new("stuck-v1", QuoteOutcome::quoted(dec!(1)))
			.with_delay(Duration::from_secs(60)),
	);
	let dispatcher = dispatcher_with(vec![stuck]);

	let results = dispatcher
		.dispatch(
			Arc::new(bakery_snapshot()),
			vec![attempt("slow-carrier", "stuck-v1", true)],
		)
		.await;

	assert_eq!(results[0].outcome.status, QuoteStatus::Error);
	assert!(results[0].outcome.reasons[0].contains("deadline"));
}

#[tokio::test]
async fn validate_carriers_accepts_known_adapters() {
	let adapter = Arc::new(MockQuoteAdapter::new("known-v1", QuoteOutcome::referred()));
	let dispatcher = dispatcher_with(vec![adapter]);

	let carriers = vec![
		carrier("ok-carrier", "known-v1", true),
		carrier("retired", "gone-v1", false),
	];
	assert!(dispatcher.validate_carriers(&carriers).is_ok());

	let broken = vec![carrier("broken", "gone-v1", true)];
	let errors = dispatcher.validate_carriers(&broken).unwrap_err();
	assert_eq!(errors.len(), 1);
}
