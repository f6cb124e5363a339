//! Lightweight indicative-pricing outcome
//!
//! Some carriers expose a pre-qualification pricing call distinct from full
//! quoting. Its result is the got-pricing / out-of-appetite / pricing-error
//! triad rather than the full status taxonomy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of an adapter's `price()` operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PricingOutcome {
	/// Carrier returned an indicative premium
	Priced {
		premium: Decimal,
		quote_number: Option<String>,
	},

	/// Carrier pre-qualified the risk as outside its appetite
	OutOfAppetite { reasons: Vec<String> },

	/// Pricing call failed; same transport/shape taxonomy as quote errors
	PricingError { reasons: Vec<String> },
}

impl PricingOutcome {
	pub fn priced(premium: Decimal) -> Self {
		Self::Priced {
			premium,
			quote_number: None,
		}
	}

	pub fn out_of_appetite(reasons: Vec<String>) -> Self {
		Self::OutOfAppetite { reasons }
	}

	pub fn pricing_error(reason: String) -> Self {
		Self::PricingError {
			reasons: vec![reason],
		}
	}

	pub fn got_pricing(&self) -> bool {
		matches!(self, Self::Priced { .. })
	}

	pub fn is_out_of_appetite(&self) -> bool {
		matches!(self, Self::OutOfAppetite { .. })
	}

	pub fn is_pricing_error(&self) -> bool {
		matches!(self, Self::PricingError { .. })
	}

	pub fn premium(&self) -> Option<Decimal> {
		match self {
			Self::Priced { premium, .. } => Some(*premium),
			_ => None,
		}
	}
}
