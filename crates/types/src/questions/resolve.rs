//! Answer derivation shared by all carrier adapters
//!
//! For every catalog entry: resolve the carrier code, apply skip and
//! applicability rules, then derive a typed answer from the raw stored value.
//! Unanswered questions are omitted, never defaulted; omission semantics
//! differ by carrier and "not applicable" must not collapse into "no".

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use super::{QuestionCatalogEntry, QuestionError, QuestionResult, QuestionType};
use crate::application::ApplicationSnapshot;

/// Carrier-specific yes/no vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolTokens {
	pub yes: &'static str,
	pub no: &'static str,
}

impl BoolTokens {
	pub const YES_NO: BoolTokens = BoolTokens { yes: "YES", no: "NO" };
	pub const Y_N: BoolTokens = BoolTokens { yes: "Y", no: "N" };
	pub const TRUE_FALSE: BoolTokens = BoolTokens {
		yes: "true",
		no: "false",
	};

	fn token(&self, value: bool) -> &'static str {
		if value {
			self.yes
		} else {
			self.no
		}
	}
}

/// Per-carrier resolution settings supplied by the adapter
#[derive(Debug, Clone)]
pub struct ResolutionRules<'a> {
	pub bool_tokens: BoolTokens,

	/// Carrier codes the adapter answers through structural request fields
	/// (governing class code, entity type and the like) rather than as
	/// generic question/answer pairs
	pub handled_elsewhere: &'a [&'a str],
}

impl<'a> ResolutionRules<'a> {
	pub fn new(bool_tokens: BoolTokens) -> Self {
		Self {
			bool_tokens,
			handled_elsewhere: &[],
		}
	}

	pub fn with_handled_elsewhere(mut self, codes: &'a [&'a str]) -> Self {
		self.handled_elsewhere = codes;
		self
	}
}

/// A derived, carrier-ready answer value
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
	/// Carrier yes/no token, polarity already applied
	Bool(&'static str),
	Numeric(Decimal),
	Text(String),
}

/// One question ready to be emitted in a carrier request
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnswer {
	pub carrier_code: String,
	pub question_type: QuestionType,
	pub value: AnswerValue,
}

/// Derive carrier answers for every applicable catalog entry
///
/// Only entries with a carrier code that pass skip, handled-elsewhere and
/// applicability checks and actually have a stored answer produce output.
/// A malformed stored answer drops the question with a warning unless the
/// entry is required-for-quote, in which case the whole resolution fails
/// naming the question.
pub fn resolve_answers(
	snapshot: &ApplicationSnapshot,
	catalog: &[QuestionCatalogEntry],
	rules: &ResolutionRules<'_>,
) -> QuestionResult<Vec<ResolvedAnswer>> {
	let state = snapshot.primary_state();
	let policy_type = snapshot.policy.policy_type;
	let mut resolved = Vec::new();

	for entry in catalog {
		let carrier_code = match &entry.carrier_code {
			Some(code) => code,
			None => continue,
		};
		if entry.skip {
			continue;
		}
		if rules.handled_elsewhere.contains(&carrier_code.as_str()) {
			continue;
		}
		if !entry.applies_to(state, policy_type) {
			continue;
		}
		let raw = match snapshot.answer(&entry.internal_id) {
			Some(raw) if !raw.trim().is_empty() => raw.trim(),
			_ => continue,
		};

		match derive_value(entry, raw, rules) {
			Ok(value) => resolved.push(ResolvedAnswer {
				carrier_code: carrier_code.clone(),
				question_type: entry.question_type,
				value,
			}),
			Err(reason) if entry.required_for_quote => {
				return Err(QuestionError::MalformedRequired {
					internal_id: entry.internal_id.clone(),
					reason,
				});
			},
			Err(reason) => {
				warn!(
					"Dropping question '{}' with unparseable answer: {}",
					entry.internal_id, reason
				);
			},
		}
	}

	Ok(resolved)
}

fn derive_value(
	entry: &QuestionCatalogEntry,
	raw: &str,
	rules: &ResolutionRules<'_>,
) -> Result<AnswerValue, String> {
	match entry.question_type {
		QuestionType::Boolean => {
			let value = parse_bool(raw).ok_or_else(|| format!("'{}' is not a yes/no value", raw))?;
			let value = if entry.invert_boolean { !value } else { value };
			Ok(AnswerValue::Bool(rules.bool_tokens.token(value)))
		},
		QuestionType::Numeric => Decimal::from_str(raw)
			.map(AnswerValue::Numeric)
			.map_err(|e| format!("'{}' is not numeric: {}", raw, e)),
		QuestionType::Text => {
			// Numeric-looking free text goes out as a numeric answer.
			match Decimal::from_str(raw) {
				Ok(number) => Ok(AnswerValue::Numeric(number)),
				Err(_) => Ok(AnswerValue::Text(raw.to_string())),
			}
		},
	}
}

fn parse_bool(raw: &str) -> Option<bool> {
	match raw.to_ascii_lowercase().as_str() {
		"true" | "yes" | "y" | "1" => Some(true),
		"false" | "no" | "n" | "0" => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::application::{
		Address, ApplicationSnapshot, Business, EntityType, IndustryClassification, Location,
		PolicyRequest, PolicyType,
	};
	use crate::limits::LimitTuple;
	use chrono::NaiveDate;
	use rust_decimal_macros::dec;
	use std::collections::HashMap;

	fn snapshot_with_answers(answers: Vec<(&str, &str)>) -> ApplicationSnapshot {
		ApplicationSnapshot {
			application_id: "app-q".to_string(),
			business: Business {
				legal_name: "Test Co".to_string(),
				dba_name: None,
				fein: None,
				entity_type: EntityType::Corporation,
				years_in_business: None,
				industry: IndustryClassification {
					internal_code: "office".to_string(),
					description: None,
				},
				website: None,
			},
			locations: vec![Location {
				address: Address {
					line1: "1 Test Way".to_string(),
					line2: None,
					city: "Austin".to_string(),
					state: "TX".to_string(),
					zip: "78701".to_string(),
				},
				full_time_employees: 5,
				part_time_employees: 0,
				exposures: vec![],
				construction: None,
			}],
			owners: vec![],
			contacts: vec![],
			claims: vec![],
			policy: PolicyRequest {
				policy_type: PolicyType::WorkersCompensation,
				effective_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
				expiration_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
				requested_limits: LimitTuple::new(vec![500_000, 500_000, 500_000]),
				deductible: None,
			},
			answers: answers
				.into_iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		}
	}

	fn rules() -> ResolutionRules<'static> {
		ResolutionRules::new(BoolTokens::YES_NO)
	}

	#[test]
	fn test_unmapped_question_is_omitted() {
		let snapshot = snapshot_with_answers(vec![("q-hazmat", "yes")]);
		let catalog = vec![QuestionCatalogEntry::unmapped(
			"q-hazmat",
			QuestionType::Boolean,
		)];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert!(resolved.is_empty());
	}

	#[test]
	fn test_boolean_token_derivation() {
		let snapshot = snapshot_with_answers(vec![("q-hazmat", "no")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-hazmat",
			QuestionType::Boolean,
			"CARRIER-9",
		)];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert_eq!(resolved.len(), 1);
		assert_eq!(resolved[0].carrier_code, "CARRIER-9");
		assert_eq!(resolved[0].value, AnswerValue::Bool("NO"));
	}

	#[test]
	fn test_inverted_polarity_is_applied() {
		// "Do you handle hazardous materials? no" becomes YES when the
		// carrier phrases the question in the negative.
		let snapshot = snapshot_with_answers(vec![("q-hazmat", "no")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-hazmat",
			QuestionType::Boolean,
			"CARRIER-9",
		)
		.with_inverted_polarity()];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert_eq!(resolved[0].value, AnswerValue::Bool("YES"));
	}

	#[test]
	fn test_numeric_looking_text_becomes_numeric() {
		let snapshot = snapshot_with_answers(vec![("q-subs-pct", "12.5")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-subs-pct",
			QuestionType::Text,
			"CARRIER-4",
		)];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert_eq!(resolved[0].value, AnswerValue::Numeric(dec!(12.5)));
	}

	#[test]
	fn test_free_text_stays_text() {
		let snapshot = snapshot_with_answers(vec![("q-describe", "seasonal catering work")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-describe",
			QuestionType::Text,
			"CARRIER-5",
		)];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert_eq!(
			resolved[0].value,
			AnswerValue::Text("seasonal catering work".to_string())
		);
	}

	#[test]
	fn test_unanswered_question_is_omitted_not_defaulted() {
		let snapshot = snapshot_with_answers(vec![]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-hazmat",
			QuestionType::Boolean,
			"CARRIER-9",
		)];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert!(resolved.is_empty());
	}

	#[test]
	fn test_malformed_optional_answer_is_dropped() {
		let snapshot = snapshot_with_answers(vec![("q-employees", "a few")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-employees",
			QuestionType::Numeric,
			"CARRIER-2",
		)];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert!(resolved.is_empty());
	}

	#[test]
	fn test_malformed_required_answer_fails_naming_question() {
		let snapshot = snapshot_with_answers(vec![("q-employees", "a few")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-employees",
			QuestionType::Numeric,
			"CARRIER-2",
		)
		.required()];

		let err = resolve_answers(&snapshot, &catalog, &rules()).unwrap_err();
		assert_eq!(err.internal_id(), "q-employees");
	}

	#[test]
	fn test_handled_elsewhere_codes_are_skipped() {
		let snapshot = snapshot_with_answers(vec![("q-entity-type", "yes")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-entity-type",
			QuestionType::Boolean,
			"CARRIER-ENTITY",
		)];
		let rules = ResolutionRules::new(BoolTokens::YES_NO)
			.with_handled_elsewhere(&["CARRIER-ENTITY"]);

		let resolved = resolve_answers(&snapshot, &catalog, &rules).unwrap();
		assert!(resolved.is_empty());
	}

	#[test]
	fn test_inapplicable_state_is_skipped() {
		let snapshot = snapshot_with_answers(vec![("q-quake", "yes")]);
		let catalog = vec![QuestionCatalogEntry::new(
			"q-quake",
			QuestionType::Boolean,
			"CARRIER-7",
		)
		.for_states(vec!["CA".to_string()])];

		let resolved = resolve_answers(&snapshot, &catalog, &rules()).unwrap();
		assert!(resolved.is_empty());
	}
}
