//! Mock adapters and transports for examples and testing
//!
//! Working test doubles hosts can wire up without touching the network: a
//! scripted transport that records what went over the wire, and a canned
//! adapter returning a fixed outcome.

use async_trait::async_trait;
use qwire_adapters::transport::{HttpTransport, WireBody, WireRequest, WireResponse};
use qwire_types::{
	Adapter, AdapterError, AdapterRequirements, AdapterResult, ApplicationSnapshot, QuoteAdapter,
	QuoteContext, QuoteOutcome,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted transport double
///
/// Returns queued responses in order and records every request so tests can
/// assert on what actually went over the wire.
#[derive(Debug, Default)]
pub struct StubTransport {
	responses: Mutex<Vec<AdapterResult<WireResponse>>>,
	requests: Mutex<Vec<WireRequest>>,
	calls: AtomicUsize,
}

impl StubTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue an HTTP response
	pub fn with_response(self, status: u16, body: &str) -> Self {
		self.responses.lock().unwrap().push(Ok(WireResponse {
			status,
			body: body.to_string(),
		}));
		self
	}

	/// Queue a network-level fault
	pub fn with_fault(self, fault: AdapterError) -> Self {
		self.responses.lock().unwrap().push(Err(fault));
		self
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn recorded_requests(&self) -> Vec<WireRequest> {
		self.requests.lock().unwrap().clone()
	}

	/// Body of the nth recorded request, rendered as a string
	pub fn request_body(&self, index: usize) -> String {
		match &self.recorded_requests()[index].body {
			WireBody::Empty => String::new(),
			WireBody::Json(value) => value.to_string(),
			WireBody::Markup(document) => document.clone(),
			WireBody::Form(fields) => format!("{:?}", fields),
		}
	}
}

#[async_trait]
impl HttpTransport for StubTransport {
	async fn execute(&self, request: WireRequest) -> AdapterResult<WireResponse> {
		self.requests.lock().unwrap().push(request);
		self.calls.fetch_add(1, Ordering::SeqCst);

		let mut responses = self.responses.lock().unwrap();
		if responses.is_empty() {
			return Err(AdapterError::Network(
				"no scripted response left".to_string(),
			));
		}
		responses.remove(0)
	}
}

/// Canned adapter: fixed outcome, optional delay, call counting
#[derive(Debug)]
pub struct MockQuoteAdapter {
	info: Adapter,
	outcome: QuoteOutcome,
	delay: Option<Duration>,
	requirements: AdapterRequirements,
	pub calls: AtomicUsize,
}

impl MockQuoteAdapter {
	pub fn new(adapter_id: &str, outcome: QuoteOutcome) -> Self {
		Self {
			info: Adapter::new(adapter_id, adapter_id, "0.0.0"),
			outcome,
			delay: None,
			requirements: AdapterRequirements::default(),
			calls: AtomicUsize::new(0),
		}
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn with_requirements(mut self, requirements: AdapterRequirements) -> Self {
		self.requirements = requirements;
		self
	}
}

#[async_trait]
impl QuoteAdapter for MockQuoteAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.info
	}

	fn requirements(&self) -> AdapterRequirements {
		self.requirements
	}

	async fn quote(&self, _snapshot: &ApplicationSnapshot, _ctx: &QuoteContext) -> QuoteOutcome {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		self.outcome.clone()
	}
}
