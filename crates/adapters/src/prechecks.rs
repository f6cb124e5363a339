//! Business-rule pre-checks run before any carrier call
//!
//! Each adapter declares its carrier's local acceptance rules; violations
//! collapse into a single `autodeclined` outcome with every violated rule
//! listed, and the carrier is never contacted.

use qwire_types::{ApplicationSnapshot, EntityType, QuoteContext, QuoteOutcome};
use tracing::debug;

/// A carrier's locally checkable acceptance rules
#[derive(Debug, Clone)]
pub struct PrecheckRules {
	/// Entity types the carrier writes; empty means all
	pub supported_entity_types: &'static [EntityType],

	/// Maximum number of locations the carrier accepts
	pub max_locations: Option<usize>,

	/// Whether the carrier quotes policies covering included owners
	pub allow_included_owners: bool,

	/// Whether every exposure class code must have a carrier mapping
	pub requires_class_mappings: bool,
}

impl Default for PrecheckRules {
	fn default() -> Self {
		Self {
			supported_entity_types: &[],
			max_locations: None,
			allow_included_owners: true,
			requires_class_mappings: false,
		}
	}
}

/// Run every pre-check, collecting all violations
///
/// Returns `Err` with a ready-made `autodeclined` outcome when any rule is
/// violated; reasons name each failed rule in operator-readable terms.
pub fn run(
	snapshot: &ApplicationSnapshot,
	ctx: &QuoteContext,
	rules: &PrecheckRules,
) -> Result<(), QuoteOutcome> {
	let mut reasons = Vec::new();

	if !rules.supported_entity_types.is_empty()
		&& !rules
			.supported_entity_types
			.contains(&snapshot.business.entity_type)
	{
		reasons.push(format!(
			"carrier does not write {:?} entities",
			snapshot.business.entity_type
		));
	}

	if let Some(max) = rules.max_locations {
		if snapshot.locations.len() > max {
			reasons.push(format!(
				"carrier accepts at most {} locations, application has {}",
				max,
				snapshot.locations.len()
			));
		}
	}

	if !rules.allow_included_owners && snapshot.has_included_owners() {
		reasons.push("carrier does not quote policies with owners included in coverage".to_string());
	}

	if rules.requires_class_mappings {
		if let Some(state) = snapshot.primary_state() {
			for code in snapshot.class_codes() {
				if ctx.code_mappings.lookup(code, state).is_none() {
					reasons.push(format!(
						"no carrier class code mapping for '{}' in {}",
						code, state
					));
				}
			}
		} else {
			reasons.push("application has no location to derive a rating state from".to_string());
		}
	}

	if reasons.is_empty() {
		Ok(())
	} else {
		debug!(
			"Pre-checks failed for carrier {}: {:?}",
			ctx.config.carrier_id, reasons
		);
		Err(QuoteOutcome::autodeclined(reasons))
	}
}
