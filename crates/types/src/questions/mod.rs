//! Question catalog and carrier answer resolution
//!
//! The host platform owns a catalog of underwriting questions keyed by
//! internal id. Each carrier answers a subset of them under its own question
//! codes, with its own yes/no vocabulary and occasionally inverted polarity.
//! The catalog entries handed to an adapter are already scoped to one
//! carrier: the carrier code is resolved (or absent) per entry.

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod resolve;

pub use errors::QuestionError;
pub use resolve::{resolve_answers, AnswerValue, BoolTokens, ResolutionRules, ResolvedAnswer};

use crate::application::PolicyType;

/// Result type for question resolution
pub type QuestionResult<T> = Result<T, QuestionError>;

/// The answer shape a question expects
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
	Boolean,
	Numeric,
	Text,
}

/// One catalog entry, scoped to a single carrier for a single attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionCatalogEntry {
	/// Internal question id in the platform vocabulary
	pub internal_id: String,

	pub question_type: QuestionType,

	/// The carrier's native code for this question; `None` means the carrier
	/// never asks it and the question is silently omitted
	pub carrier_code: Option<String>,

	/// Carrier-level skip flag for questions the carrier maps but ignores
	pub skip: bool,

	/// Boolean polarity inversion for this carrier's code. An explicit,
	/// auditable per-question flag, never a heuristic.
	pub invert_boolean: bool,

	/// When true, a malformed stored answer fails the whole attempt instead
	/// of being dropped
	pub required_for_quote: bool,

	/// States this question applies in; `None` means all states
	pub states: Option<Vec<String>>,

	/// Policy lines this question applies to; `None` means all lines
	pub policy_types: Option<Vec<PolicyType>>,
}

impl QuestionCatalogEntry {
	/// A mapped entry applicable everywhere, the common case
	pub fn new(internal_id: &str, question_type: QuestionType, carrier_code: &str) -> Self {
		Self {
			internal_id: internal_id.to_string(),
			question_type,
			carrier_code: Some(carrier_code.to_string()),
			skip: false,
			invert_boolean: false,
			required_for_quote: false,
			states: None,
			policy_types: None,
		}
	}

	/// An entry the carrier has no code for
	pub fn unmapped(internal_id: &str, question_type: QuestionType) -> Self {
		Self {
			internal_id: internal_id.to_string(),
			question_type,
			carrier_code: None,
			skip: false,
			invert_boolean: false,
			required_for_quote: false,
			states: None,
			policy_types: None,
		}
	}

	pub fn with_inverted_polarity(mut self) -> Self {
		self.invert_boolean = true;
		self
	}

	pub fn required(mut self) -> Self {
		self.required_for_quote = true;
		self
	}

	pub fn skipped(mut self) -> Self {
		self.skip = true;
		self
	}

	pub fn for_states(mut self, states: Vec<String>) -> Self {
		self.states = Some(states);
		self
	}

	pub fn for_policy_types(mut self, policy_types: Vec<PolicyType>) -> Self {
		self.policy_types = Some(policy_types);
		self
	}

	/// Whether this entry applies to the given state and policy line
	pub fn applies_to(&self, state: Option<&str>, policy_type: PolicyType) -> bool {
		let state_ok = match (&self.states, state) {
			(Some(states), Some(state)) => states.iter().any(|s| s == state),
			(Some(_), None) => false,
			(None, _) => true,
		};
		let policy_ok = self
			.policy_types
			.as_ref()
			.map(|types| types.contains(&policy_type))
			.unwrap_or(true);

		state_ok && policy_ok
	}
}
