//! Shared fixtures for the integration tests

// Each test binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use chrono::NaiveDate;
use quotewire::types::{
	ActivityExposure, Address, ApplicationSnapshot, Business, Carrier, CarrierEndpoints,
	CodeMappingSet, EntityType, IndustryClassification, LimitTuple, Location, PolicyRequest,
	PolicyType, QuestionCatalogEntry, QuestionType,
};
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// A small bakery in Wisconsin requesting WC at 500k/500k/500k
pub fn bakery_snapshot() -> ApplicationSnapshot {
	ApplicationSnapshot {
		application_id: "app-bakery-1".to_string(),
		business: Business {
			legal_name: "Blue Fern Bakery LLC".to_string(),
			dba_name: Some("Blue Fern".to_string()),
			fein: Some("12-3456789".to_string()),
			entity_type: EntityType::Llc,
			years_in_business: Some(6),
			industry: IndustryClassification {
				internal_code: "retail-bakery".to_string(),
				description: Some("Retail bakery".to_string()),
			},
			website: None,
		},
		locations: vec![Location {
			address: Address {
				line1: "12 Main St".to_string(),
				line2: None,
				city: "Madison".to_string(),
				state: "WI".to_string(),
				zip: "53703".to_string(),
			},
			full_time_employees: 4,
			part_time_employees: 2,
			exposures: vec![ActivityExposure {
				internal_class_code: "retail-bakery".to_string(),
				annual_payroll: dec!(180000),
				employee_count: 6,
			}],
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
		answers: HashMap::new(),
	}
}

pub fn snapshot_with_limits(limits: LimitTuple) -> ApplicationSnapshot {
	let mut snapshot = bakery_snapshot();
	snapshot.policy.requested_limits = limits;
	snapshot
}

pub fn snapshot_with_answers(answers: Vec<(&str, &str)>) -> ApplicationSnapshot {
	let mut snapshot = bakery_snapshot();
	snapshot.answers = answers
		.into_iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect();
	snapshot
}

pub fn carrier(carrier_id: &str, adapter_id: &str, enabled: bool) -> Carrier {
	Carrier {
		carrier_id: carrier_id.to_string(),
		adapter_id: adapter_id.to_string(),
		policy_type: PolicyType::WorkersCompensation,
		endpoints: CarrierEndpoints {
			sandbox_host: "https://sandbox.carrier.example.com".to_string(),
			sandbox_path: "/rating/quote".to_string(),
			production_host: "https://api.carrier.example.com".to_string(),
			production_path: "/rating/quote".to_string(),
		},
		timeout_ms: 5_000,
		enabled,
		headers: None,
		name: None,
		description: None,
	}
}

pub fn wc_mappings() -> CodeMappingSet {
	CodeMappingSet::new().with_mapping("retail-bakery", "WI", "2003")
}

/// Two boolean questions: one mapped to the carrier, one not
pub fn mixed_question_catalog() -> Vec<QuestionCatalogEntry> {
	vec![
		QuestionCatalogEntry::new("q-hazmat", QuestionType::Boolean, "CQ-HAZMAT"),
		QuestionCatalogEntry::unmapped("q-internal-only", QuestionType::Boolean),
	]
}
