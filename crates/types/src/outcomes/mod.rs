//! Canonical quote outcome model shared by every adapter
//!
//! Whatever a carrier answers on the wire, an adapter invocation ends in
//! exactly one `QuoteOutcome`. Carrier status vocabularies never leak into
//! the canonical status; carrier reason text is carried in `reasons`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod pricing;

pub use pricing::PricingOutcome;

/// Canonical terminal status of one quote attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
	/// Never sent to the carrier; a local pre-check failed
	Autodeclined,
	/// Carrier explicitly rejected the risk
	Declined,
	/// Transport, authentication or unexpected-shape failure
	Error,
	/// Carrier-signaled temporary unavailability
	Outage,
	/// Carrier requires human underwriter review, no price attached
	Referred,
	/// Referral with an indicative premium attached
	ReferredWithPrice,
	/// Bindable quote with premium
	Quoted,
	/// Non-binding premium estimate only
	PriceIndication,
}

impl QuoteStatus {
	/// Whether this status may carry a premium amount
	pub fn carries_premium(&self) -> bool {
		matches!(
			self,
			QuoteStatus::Quoted | QuoteStatus::ReferredWithPrice | QuoteStatus::PriceIndication
		)
	}

	/// Whether this status requires at least one reason
	pub fn requires_reasons(&self) -> bool {
		matches!(
			self,
			QuoteStatus::Autodeclined
				| QuoteStatus::Declined
				| QuoteStatus::Error
				| QuoteStatus::Outage
		)
	}
}

/// Premium breakdown for one coverage on a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageLine {
	pub code: String,
	pub label: Option<String>,
	pub limit: Option<String>,
	pub premium: Option<Decimal>,
}

/// A quote letter or proposal document returned by the carrier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LetterAttachment {
	pub file_name: String,
	pub content_type: String,
	/// Base64-encoded document body as returned by the carrier
	pub data: String,
}

/// Violations of the outcome model's invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutcomeError {
	#[error("status '{status:?}' must not carry a premium amount")]
	UnexpectedPremium { status: QuoteStatus },

	#[error("status '{status:?}' requires a non-empty reasons list")]
	MissingReasons { status: QuoteStatus },

	#[error("premium amount must not be negative")]
	NegativePremium,
}

/// The canonical result of one adapter invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteOutcome {
	pub status: QuoteStatus,

	/// Present only for quoted / referred-with-price / price-indication
	pub premium: Option<Decimal>,

	/// Carrier's quote or submission number, when one was issued
	pub quote_number: Option<String>,

	/// The negotiated limits the carrier actually quoted
	pub limits: Option<crate::limits::LimitTuple>,

	pub coverage: Vec<CoverageLine>,

	/// Deep link into the carrier portal for this quote
	pub quote_link: Option<String>,

	pub letter: Option<LetterAttachment>,

	/// Human-readable diagnostics; non-empty for every negative status
	pub reasons: Vec<String>,
}

impl QuoteOutcome {
	fn bare(status: QuoteStatus) -> Self {
		Self {
			status,
			premium: None,
			quote_number: None,
			limits: None,
			coverage: Vec::new(),
			quote_link: None,
			letter: None,
			reasons: Vec::new(),
		}
	}

	/// Bindable quote with premium
	pub fn quoted(premium: Decimal) -> Self {
		Self {
			premium: Some(premium),
			..Self::bare(QuoteStatus::Quoted)
		}
	}

	/// Pre-check failure; the carrier was never called
	pub fn autodeclined(reasons: Vec<String>) -> Self {
		Self {
			reasons,
			..Self::bare(QuoteStatus::Autodeclined)
		}
	}

	/// Carrier-declared rejection with the carrier's stated reasons
	pub fn declined(reasons: Vec<String>) -> Self {
		Self {
			reasons,
			..Self::bare(QuoteStatus::Declined)
		}
	}

	/// Transport, auth or shape failure
	pub fn error(reason: String) -> Self {
		Self {
			reasons: vec![reason],
			..Self::bare(QuoteStatus::Error)
		}
	}

	/// Carrier-signaled temporary unavailability
	pub fn outage(reason: String) -> Self {
		Self {
			reasons: vec![reason],
			..Self::bare(QuoteStatus::Outage)
		}
	}

	/// Referral without price
	pub fn referred() -> Self {
		Self::bare(QuoteStatus::Referred)
	}

	/// Referral with an indicative premium
	pub fn referred_with_price(premium: Decimal) -> Self {
		Self {
			premium: Some(premium),
			..Self::bare(QuoteStatus::ReferredWithPrice)
		}
	}

	/// Non-binding premium estimate
	pub fn price_indication(premium: Decimal) -> Self {
		Self {
			premium: Some(premium),
			..Self::bare(QuoteStatus::PriceIndication)
		}
	}

	pub fn with_quote_number(mut self, quote_number: String) -> Self {
		self.quote_number = Some(quote_number);
		self
	}

	pub fn with_limits(mut self, limits: crate::limits::LimitTuple) -> Self {
		self.limits = Some(limits);
		self
	}

	pub fn with_coverage(mut self, coverage: Vec<CoverageLine>) -> Self {
		self.coverage = coverage;
		self
	}

	pub fn with_quote_link(mut self, quote_link: String) -> Self {
		self.quote_link = Some(quote_link);
		self
	}

	pub fn with_letter(mut self, letter: LetterAttachment) -> Self {
		self.letter = Some(letter);
		self
	}

	pub fn with_reason(mut self, reason: String) -> Self {
		self.reasons.push(reason);
		self
	}

	/// Check the outcome invariants
	///
	/// Premium only on priced statuses and never negative; reasons non-empty
	/// for every negative status.
	pub fn validate(&self) -> Result<(), OutcomeError> {
		if self.premium.is_some() && !self.status.carries_premium() {
			return Err(OutcomeError::UnexpectedPremium {
				status: self.status,
			});
		}
		if let Some(premium) = self.premium {
			if premium.is_sign_negative() {
				return Err(OutcomeError::NegativePremium);
			}
		}
		if self.status.requires_reasons() && self.reasons.is_empty() {
			return Err(OutcomeError::MissingReasons {
				status: self.status,
			});
		}
		Ok(())
	}
}
