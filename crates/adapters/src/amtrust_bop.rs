//! AmTrust Business Owners Policy adapter
//!
//! JSON API authenticated with a static API key header. BOP limits are
//! occurrence/aggregate pairs. AmTrust signals planned maintenance with a
//! carrier error code in an otherwise well-formed response; that maps to the
//! outage outcome, not an error.

use async_trait::async_trait;
use qwire_types::{
	Adapter, AdapterError, AdapterRequirements, AdapterResult, AnswerValue, ApplicationSnapshot,
	BoolTokens, CarrierLimitSet, CoverageLine, EntityType, LimitTuple, QuoteAdapter, QuoteContext,
	QuoteOutcome, ResolutionRules, resolve_answers,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::classify::outcome_from_fault;
use crate::prechecks::{self, PrecheckRules};
use crate::transport::{json, HttpTransport, JsonSender, WireAuth};

/// Carrier codes that mean the rating system is down, not that the risk
/// failed
const OUTAGE_CODES: &[&str] = &["SYSTEM_MAINTENANCE", "RATING_UNAVAILABLE"];

const SUPPORTED_ENTITY_TYPES: &[EntityType] = &[
	EntityType::Individual,
	EntityType::Partnership,
	EntityType::Llc,
	EntityType::Corporation,
	EntityType::SCorporation,
	EntityType::NonProfit,
];

/// AmTrust BOP adapter
#[derive(Debug)]
pub struct AmTrustBopAdapter {
	info: Adapter,
	sender: JsonSender,
	limit_set: CarrierLimitSet,
}

impl AmTrustBopAdapter {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			info: Adapter::new("amtrust-bop-v1", "AmTrust Business Owners", "1.0.0")
				.with_description("JSON BOP quoting API"),
			sender: JsonSender::new(transport),
			// Occurrence/aggregate pairs, low to high.
			limit_set: CarrierLimitSet::new(vec![
				LimitTuple::new(vec![300_000, 600_000]),
				LimitTuple::new(vec![500_000, 1_000_000]),
				LimitTuple::new(vec![1_000_000, 2_000_000]),
				LimitTuple::new(vec![2_000_000, 4_000_000]),
			]),
		}
	}

	fn precheck_rules(&self) -> PrecheckRules {
		PrecheckRules {
			supported_entity_types: SUPPORTED_ENTITY_TYPES,
			max_locations: Some(5),
			allow_included_owners: true,
			requires_class_mappings: false,
		}
	}

	async fn quote_inner(
		&self,
		snapshot: &ApplicationSnapshot,
		ctx: &QuoteContext,
	) -> AdapterResult<QuoteOutcome> {
		if let Err(outcome) = prechecks::run(snapshot, ctx, &self.precheck_rules()) {
			return Ok(outcome);
		}

		let state = snapshot
			.primary_state()
			.ok_or_else(|| AdapterError::ConfigError {
				reason: "application has no location".to_string(),
			})?;
		let industry_code = match ctx
			.code_mappings
			.lookup(&snapshot.business.industry.internal_code, state)
		{
			Some(code) => code.to_string(),
			None => {
				return Ok(QuoteOutcome::autodeclined(vec![format!(
					"no carrier industry code mapping for '{}' in {}",
					snapshot.business.industry.internal_code, state
				)]));
			},
		};

		let limits = match self.limit_set.negotiate(&snapshot.policy.requested_limits) {
			Ok(limits) => limits.clone(),
			Err(fault) => return Ok(QuoteOutcome::autodeclined(vec![fault.to_string()])),
		};

		let request = build_request(snapshot, ctx, &limits, industry_code)?;
		let auth = WireAuth::from_credentials(&ctx.credentials);
		let response = self
			.sender
			.post(&ctx.config, &ctx.config.endpoint, auth, &request)
			.await?;

		if !response.is_success() {
			return Err(AdapterError::from_http_failure(response.status));
		}

		let parsed: AmTrustResponse = json::decode(&response.body)?;
		classify_response(&ctx.config.carrier_id, parsed, limits)
	}
}

#[async_trait]
impl QuoteAdapter for AmTrustBopAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.info
	}

	fn requirements(&self) -> AdapterRequirements {
		AdapterRequirements {
			needs_industry_code: true,
			needs_activity_codes: false,
		}
	}

	async fn quote(&self, snapshot: &ApplicationSnapshot, ctx: &QuoteContext) -> QuoteOutcome {
		debug!(
			"AmTrust BOP quoting application {} via carrier {}",
			snapshot.application_id, ctx.config.carrier_id
		);
		match self.quote_inner(snapshot, ctx).await {
			Ok(outcome) => outcome,
			Err(fault) => outcome_from_fault(&ctx.config.carrier_id, fault),
		}
	}
}

fn build_request(
	snapshot: &ApplicationSnapshot,
	ctx: &QuoteContext,
	limits: &LimitTuple,
	industry_code: String,
) -> AdapterResult<AmTrustRequest> {
	let rules = ResolutionRules::new(BoolTokens::TRUE_FALSE);
	let answers = resolve_answers(snapshot, &ctx.questions, &rules)?
		.into_iter()
		.map(|answer| EligibilityAnswer {
			question_code: answer.carrier_code,
			answer: match answer.value {
				AnswerValue::Bool(token) => serde_json::Value::Bool(token == "true"),
				AnswerValue::Numeric(number) => serde_json::Value::String(number.to_string()),
				AnswerValue::Text(text) => serde_json::Value::String(text),
			},
		})
		.collect();

	let locations = snapshot
		.locations
		.iter()
		.map(|location| {
			let construction = location.construction.as_ref();
			AmTrustLocation {
				address1: location.address.line1.clone(),
				city: location.address.city.clone(),
				state: location.address.state.clone(),
				zip: location.address.zip.clone(),
				year_built: construction.and_then(|c| c.year_built),
				square_footage: construction.and_then(|c| c.area_sqft),
				construction_type: construction.and_then(|c| c.construction_type.clone()),
				sprinklered: construction.and_then(|c| c.sprinklered),
			}
		})
		.collect();

	// Every tuple in this adapter's limit set is an occurrence/aggregate pair.
	let [occurrence_limit, aggregate_limit] = limits.components() else {
		return Err(AdapterError::ConfigError {
			reason: format!("expected occurrence/aggregate limit pair, got {}", limits),
		});
	};

	Ok(AmTrustRequest {
		legal_name: snapshot.business.legal_name.clone(),
		dba_name: snapshot.business.dba_name.clone(),
		fein: snapshot.business.fein.clone(),
		entity_type: entity_code(snapshot.business.entity_type).to_string(),
		industry_code,
		effective_date: snapshot.policy.effective_date.to_string(),
		expiration_date: snapshot.policy.expiration_date.to_string(),
		occurrence_limit: *occurrence_limit,
		aggregate_limit: *aggregate_limit,
		annual_payroll: snapshot.total_payroll(),
		locations,
		eligibility_answers: answers,
	})
}

fn entity_code(entity_type: EntityType) -> &'static str {
	match entity_type {
		EntityType::Individual => "Individual",
		EntityType::Partnership => "Partnership",
		EntityType::Llc => "LLC",
		EntityType::Corporation => "Corporation",
		EntityType::SCorporation => "SCorporation",
		EntityType::NonProfit => "NonProfit",
		EntityType::JointVenture => "JointVenture",
		EntityType::Trust => "Trust",
		EntityType::Other => "Other",
	}
}

fn classify_response(
	carrier_id: &str,
	response: AmTrustResponse,
	limits: LimitTuple,
) -> AdapterResult<QuoteOutcome> {
	if let Some(error_code) = &response.error_code {
		if OUTAGE_CODES.contains(&error_code.as_str()) {
			return Ok(QuoteOutcome::outage(format!(
				"carrier {} reported its rating system is unavailable",
				carrier_id
			)));
		}
		return Err(AdapterError::CarrierError {
			code: error_code.clone(),
			message: response.error_message.unwrap_or_default(),
		});
	}

	let eligibility = response
		.eligibility
		.ok_or_else(|| AdapterError::InvalidResponse {
			reason: "response carries neither eligibility nor an error code".to_string(),
		})?;

	match eligibility.to_ascii_lowercase().as_str() {
		"eligible" => {
			let premium = response
				.annual_premium
				.ok_or_else(|| AdapterError::InvalidResponse {
					reason: "eligible response without annualPremium".to_string(),
				})?;
			let coverage = response
				.coverages
				.into_iter()
				.map(|line| CoverageLine {
					code: line.coverage_code,
					label: line.description,
					limit: line.limit,
					premium: line.premium,
				})
				.collect();
			let mut outcome = QuoteOutcome::quoted(premium)
				.with_limits(limits)
				.with_coverage(coverage);
			if let Some(quote_id) = response.quote_id {
				outcome = outcome.with_quote_number(quote_id);
			}
			Ok(outcome)
		},
		"refer" => Ok(match response.annual_premium {
			Some(premium) => QuoteOutcome::referred_with_price(premium).with_limits(limits),
			None => QuoteOutcome::referred(),
		}),
		"indication" => {
			let premium = response
				.annual_premium
				.ok_or_else(|| AdapterError::InvalidResponse {
					reason: "indication response without annualPremium".to_string(),
				})?;
			Ok(QuoteOutcome::price_indication(premium).with_limits(limits))
		},
		"declined" | "ineligible" => {
			let mut reasons = response.decline_reasons;
			if reasons.is_empty() {
				reasons.push("carrier declined the risk".to_string());
			}
			Ok(QuoteOutcome::declined(reasons))
		},
		other => Err(AdapterError::InvalidResponse {
			reason: format!("unknown eligibility value '{}'", other),
		}),
	}
}

// Request payload schema

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmTrustRequest {
	legal_name: String,
	dba_name: Option<String>,
	fein: Option<String>,
	entity_type: String,
	industry_code: String,
	effective_date: String,
	expiration_date: String,
	occurrence_limit: u64,
	aggregate_limit: u64,
	annual_payroll: Decimal,
	locations: Vec<AmTrustLocation>,
	eligibility_answers: Vec<EligibilityAnswer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmTrustLocation {
	address1: String,
	city: String,
	state: String,
	zip: String,
	year_built: Option<u32>,
	square_footage: Option<u32>,
	construction_type: Option<String>,
	sprinklered: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EligibilityAnswer {
	question_code: String,
	answer: serde_json::Value,
}

// Response payload schema

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmTrustResponse {
	eligibility: Option<String>,
	annual_premium: Option<Decimal>,
	quote_id: Option<String>,
	error_code: Option<String>,
	error_message: Option<String>,
	#[serde(default)]
	decline_reasons: Vec<String>,
	#[serde(default)]
	coverages: Vec<AmTrustCoverage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmTrustCoverage {
	coverage_code: String,
	description: Option<String>,
	limit: Option<String>,
	premium: Option<Decimal>,
}
