//! Read-only application snapshot handed to every adapter
//!
//! The snapshot is assembled by the host platform for a single quote attempt
//! and discarded afterwards. Adapters receive it by shared reference and must
//! never mutate it; everything carrier-specific is derived from it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::limits::LimitTuple;

/// Legal entity type of the applicant business
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
	Individual,
	Partnership,
	Llc,
	Corporation,
	SCorporation,
	NonProfit,
	JointVenture,
	Trust,
	Other,
}

/// Policy line being quoted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
	/// Workers' Compensation
	WorkersCompensation,
	/// Business Owners Policy
	BusinessOwners,
	GeneralLiability,
	ProfessionalLiability,
	Cyber,
	Event,
}

/// Industry classification of the business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndustryClassification {
	/// Internal industry code (platform vocabulary, not carrier vocabulary)
	pub internal_code: String,

	/// Human-readable industry description
	pub description: Option<String>,
}

/// The applicant business entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Business {
	pub legal_name: String,

	/// Doing-business-as name, when it differs from the legal name
	pub dba_name: Option<String>,

	/// Federal Employer Identification Number
	pub fein: Option<String>,

	pub entity_type: EntityType,

	pub years_in_business: Option<u32>,

	pub industry: IndustryClassification,

	pub website: Option<String>,
}

/// Street address of a business location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
	pub line1: String,
	pub line2: Option<String>,
	pub city: String,
	/// Two-letter state code, used as the territory for code mapping lookups
	pub state: String,
	pub zip: String,
}

/// Payroll exposure for one activity/classification code at a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityExposure {
	/// Internal classification code; mapped to a carrier-native code per state
	pub internal_class_code: String,

	/// Annual payroll attributed to this class
	pub annual_payroll: Decimal,

	/// Employees working under this class
	pub employee_count: u32,
}

/// Construction attributes, relevant for property lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructionInfo {
	pub year_built: Option<u32>,
	pub stories: Option<u32>,
	pub area_sqft: Option<u32>,
	pub construction_type: Option<String>,
	pub sprinklered: Option<bool>,
}

/// A single business location with its exposure breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
	pub address: Address,
	pub full_time_employees: u32,
	pub part_time_employees: u32,
	pub exposures: Vec<ActivityExposure>,
	pub construction: Option<ConstructionInfo>,
}

/// Owner or officer of the business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerOfficer {
	pub name: String,
	pub title: Option<String>,
	/// Ownership percentage, 0-100
	pub ownership_pct: Decimal,
	/// Whether the owner elected to be included in coverage
	pub included_in_coverage: bool,
	pub annual_payroll: Option<Decimal>,
}

/// Contact person for the application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
	pub name: String,
	pub email: Option<String>,
	pub phone: Option<String>,
}

/// A prior claim on the applicant's loss history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimRecord {
	pub date_of_loss: NaiveDate,
	pub paid_amount: Option<Decimal>,
	pub open: bool,
	pub description: Option<String>,
}

/// The policy being requested on this application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyRequest {
	pub policy_type: PolicyType,
	pub effective_date: NaiveDate,
	pub expiration_date: NaiveDate,
	/// Requested liability limit tuple, negotiated per carrier before quoting
	pub requested_limits: LimitTuple,
	pub deductible: Option<Decimal>,
}

/// Read-only view of one application, scoped to a single quote attempt
///
/// Owned by the host platform; the framework never mutates it. One snapshot
/// is shared by reference across every concurrently running adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationSnapshot {
	pub application_id: String,
	pub business: Business,
	pub locations: Vec<Location>,
	pub owners: Vec<OwnerOfficer>,
	pub contacts: Vec<Contact>,
	pub claims: Vec<ClaimRecord>,
	pub policy: PolicyRequest,

	/// Stored question answers keyed by internal question id, raw as entered
	pub answers: HashMap<String, String>,
}

impl ApplicationSnapshot {
	/// Governing state for code mapping and question applicability
	///
	/// The first location's state; applications always carry at least one
	/// location by the time they reach quoting.
	pub fn primary_state(&self) -> Option<&str> {
		self.locations.first().map(|l| l.address.state.as_str())
	}

	/// Total annual payroll across all locations and classes
	pub fn total_payroll(&self) -> Decimal {
		self.locations
			.iter()
			.flat_map(|l| l.exposures.iter())
			.map(|e| e.annual_payroll)
			.sum()
	}

	/// Total employee head count across all locations
	pub fn total_employees(&self) -> u32 {
		self.locations
			.iter()
			.map(|l| l.full_time_employees + l.part_time_employees)
			.sum()
	}

	/// Every distinct internal classification code on the application
	pub fn class_codes(&self) -> Vec<&str> {
		let mut codes: Vec<&str> = self
			.locations
			.iter()
			.flat_map(|l| l.exposures.iter())
			.map(|e| e.internal_class_code.as_str())
			.collect();
		codes.sort_unstable();
		codes.dedup();
		codes
	}

	/// Whether any owner elected to be included in coverage
	pub fn has_included_owners(&self) -> bool {
		self.owners.iter().any(|o| o.included_in_coverage)
	}

	/// Stored raw answer for an internal question id
	pub fn answer(&self, internal_id: &str) -> Option<&str> {
		self.answers.get(internal_id).map(|s| s.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	fn snapshot_with_two_locations() -> ApplicationSnapshot {
		ApplicationSnapshot {
			application_id: "app-1".to_string(),
			business: Business {
				legal_name: "Blue Fern Bakery LLC".to_string(),
				dba_name: None,
				fein: Some("12-3456789".to_string()),
				entity_type: EntityType::Llc,
				years_in_business: Some(6),
				industry: IndustryClassification {
					internal_code: "bakery".to_string(),
					description: None,
				},
				website: None,
			},
			locations: vec![
				Location {
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
				},
				Location {
					address: Address {
						line1: "44 Oak Ave".to_string(),
						line2: None,
						city: "Milwaukee".to_string(),
						state: "WI".to_string(),
						zip: "53202".to_string(),
					},
					full_time_employees: 3,
					part_time_employees: 0,
					exposures: vec![ActivityExposure {
						internal_class_code: "retail-bakery".to_string(),
						annual_payroll: dec!(95000),
						employee_count: 3,
					}],
					construction: None,
				},
			],
			owners: vec![OwnerOfficer {
				name: "Dana Reyes".to_string(),
				title: Some("Member".to_string()),
				ownership_pct: dec!(100),
				included_in_coverage: false,
				annual_payroll: None,
			}],
			contacts: vec![],
			claims: vec![],
			policy: PolicyRequest {
				policy_type: PolicyType::WorkersCompensation,
				effective_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
				expiration_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
				requested_limits: LimitTuple::new(vec![500_000, 500_000, 500_000]),
				deductible: None,
			},
			answers: HashMap::new(),
		}
	}

	#[test]
	fn test_primary_state_and_totals() {
		let snapshot = snapshot_with_two_locations();
		assert_eq!(snapshot.primary_state(), Some("WI"));
		assert_eq!(snapshot.total_payroll(), dec!(275000));
		assert_eq!(snapshot.total_employees(), 9);
	}

	#[test]
	fn test_class_codes_deduplicated() {
		let snapshot = snapshot_with_two_locations();
		assert_eq!(snapshot.class_codes(), vec!["retail-bakery"]);
	}

	#[test]
	fn test_included_owner_detection() {
		let mut snapshot = snapshot_with_two_locations();
		assert!(!snapshot.has_included_owners());
		snapshot.owners[0].included_in_coverage = true;
		assert!(snapshot.has_included_owners());
	}
}
