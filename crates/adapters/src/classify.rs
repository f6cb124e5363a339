//! Canonical classification of adapter faults
//!
//! The adapter contract forbids letting a transport or parsing fault escape
//! `quote()`. Every fault funnels through here: raw detail goes to the log,
//! the outcome carries an operator-safe reason, and carrier-signaled
//! unavailability is distinguished from genuine failure.

use qwire_types::{AdapterError, PricingOutcome, QuoteOutcome};
use tracing::error;

/// Classify a fault into the canonical `error`/`outage` outcome
pub fn outcome_from_fault(carrier_id: &str, fault: AdapterError) -> QuoteOutcome {
	error!(
		"Quote attempt against carrier {} failed: {}",
		carrier_id, fault
	);

	if fault.is_outage() {
		return QuoteOutcome::outage(format!(
			"carrier {} is temporarily unavailable",
			carrier_id
		));
	}

	QuoteOutcome::error(fault_reason(carrier_id, &fault))
}

/// Classify a fault into the pricing triad's error arm
pub fn pricing_from_fault(carrier_id: &str, fault: AdapterError) -> PricingOutcome {
	error!(
		"Pricing attempt against carrier {} failed: {}",
		carrier_id, fault
	);
	PricingOutcome::pricing_error(fault_reason(carrier_id, &fault))
}

fn fault_reason(carrier_id: &str, fault: &AdapterError) -> String {
	match fault {
		AdapterError::Timeout { timeout_ms } => {
			format!("carrier request timed out after {}ms", timeout_ms)
		},
		AdapterError::Connection(_) | AdapterError::Network(_) => {
			format!("carrier {} could not be reached", carrier_id)
		},
		AdapterError::HttpStatus { status_code, .. } => {
			format!("carrier rejected the call with HTTP {}", status_code)
		},
		AdapterError::AuthenticationFailed { .. } => {
			format!("authentication with carrier {} failed", carrier_id)
		},
		AdapterError::InvalidResponse { .. }
		| AdapterError::Markup(_)
		| AdapterError::Serialization(_) => {
			format!("carrier {} returned an unexpected response", carrier_id)
		},
		AdapterError::Question(question_fault) => format!(
			"could not derive an answer for required question '{}'",
			question_fault.internal_id()
		),
		AdapterError::CarrierError { code, .. } => {
			format!("carrier reported error code {}", code)
		},
		_ => format!("quote attempt against carrier {} failed", carrier_id),
	}
}
