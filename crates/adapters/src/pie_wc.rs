//! Pie Workers' Compensation adapter
//!
//! JSON API behind an OAuth2 client-credential exchange. Bearer tokens are
//! cached per carrier and refreshed near expiry. Pie also exposes a
//! pre-qualification pricing call distinct from full quoting, surfaced
//! through `price()`.

use async_trait::async_trait;
use qwire_types::{
	Adapter, AdapterError, AdapterRequirements, AdapterResult, AnswerValue, ApplicationSnapshot,
	BoolTokens, CarrierCredentials, CarrierLimitSet, EntityType, LimitTuple, PricingOutcome,
	QuoteAdapter, QuoteContext, QuoteOutcome, ResolutionRules, SecretString, resolve_answers,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::classify::{outcome_from_fault, pricing_from_fault};
use crate::prechecks::{self, PrecheckRules};
use crate::transport::json::TokenCache;
use crate::transport::{join_url, HttpTransport, JsonSender, WireAuth};

const SUPPORTED_ENTITY_TYPES: &[EntityType] = &[
	EntityType::Individual,
	EntityType::Partnership,
	EntityType::Llc,
	EntityType::Corporation,
	EntityType::SCorporation,
	EntityType::NonProfit,
];

/// Pie WC adapter
#[derive(Debug)]
pub struct PieWcAdapter {
	info: Adapter,
	sender: JsonSender,
	tokens: TokenCache,
	limit_set: CarrierLimitSet,
}

impl PieWcAdapter {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			info: Adapter::new("pie-wc-v1", "Pie Workers' Compensation", "1.0.0")
				.with_description("JSON quoting API with OAuth2 client credentials"),
			sender: JsonSender::new(transport),
			tokens: TokenCache::new(),
			limit_set: CarrierLimitSet::new(vec![
				LimitTuple::new(vec![100_000, 500_000, 100_000]),
				LimitTuple::new(vec![500_000, 500_000, 500_000]),
				LimitTuple::new(vec![1_000_000, 1_000_000, 1_000_000]),
			]),
		}
	}

	fn precheck_rules(&self) -> PrecheckRules {
		PrecheckRules {
			supported_entity_types: SUPPORTED_ENTITY_TYPES,
			max_locations: None,
			allow_included_owners: true,
			requires_class_mappings: true,
		}
	}

	/// Cached bearer token, exchanging client credentials when absent or near
	/// expiry
	async fn bearer(&self, ctx: &QuoteContext) -> AdapterResult<SecretString> {
		if let Some(token) = self.tokens.valid_token(&ctx.config.carrier_id) {
			return Ok(token);
		}

		let (client_id, client_secret, token_path, scope) = match &ctx.credentials {
			CarrierCredentials::OAuth2 {
				client_id,
				client_secret,
				token_path,
				scope,
			} => (client_id, client_secret, token_path, scope.as_deref()),
			_ => {
				return Err(AdapterError::ConfigError {
					reason: "Pie requires OAuth2 client credentials".to_string(),
				});
			},
		};

		let token = self
			.sender
			.oauth2_token(&ctx.config, client_id, client_secret, token_path, scope)
			.await?;
		self.tokens.store(&ctx.config.carrier_id, token.clone());
		Ok(token.token)
	}

	async fn quote_inner(
		&self,
		snapshot: &ApplicationSnapshot,
		ctx: &QuoteContext,
	) -> AdapterResult<QuoteOutcome> {
		if let Err(outcome) = prechecks::run(snapshot, ctx, &self.precheck_rules()) {
			return Ok(outcome);
		}

		let limits = match self.limit_set.negotiate(&snapshot.policy.requested_limits) {
			Ok(limits) => limits.clone(),
			Err(fault) => return Ok(QuoteOutcome::autodeclined(vec![fault.to_string()])),
		};

		let request = build_request(snapshot, ctx, &limits)?;
		let token = self.bearer(ctx).await?;
		let response = self
			.sender
			.post(
				&ctx.config,
				&ctx.config.endpoint,
				WireAuth::Bearer(token),
				&request,
			)
			.await?;

		if !response.is_success() {
			return Err(AdapterError::from_http_failure(response.status));
		}

		let parsed: PieQuoteResponse = crate::transport::json::decode(&response.body)?;
		classify_quote(parsed, limits)
	}

	async fn price_inner(
		&self,
		snapshot: &ApplicationSnapshot,
		ctx: &QuoteContext,
	) -> AdapterResult<PricingOutcome> {
		if let Err(outcome) = prechecks::run(snapshot, ctx, &self.precheck_rules()) {
			return Ok(PricingOutcome::out_of_appetite(outcome.reasons));
		}

		let limits = match self.limit_set.negotiate(&snapshot.policy.requested_limits) {
			Ok(limits) => limits.clone(),
			Err(fault) => return Ok(PricingOutcome::out_of_appetite(vec![fault.to_string()])),
		};

		let request = build_request(snapshot, ctx, &limits)?;
		let token = self.bearer(ctx).await?;
		let url = join_url(&ctx.config.endpoint, "indication")?;
		let response = self
			.sender
			.post(&ctx.config, &url, WireAuth::Bearer(token), &request)
			.await?;

		if !response.is_success() {
			return Err(AdapterError::from_http_failure(response.status));
		}

		let parsed: PiePricingResponse = crate::transport::json::decode(&response.body)?;
		Ok(classify_pricing(parsed))
	}
}

#[async_trait]
impl QuoteAdapter for PieWcAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.info
	}

	fn requirements(&self) -> AdapterRequirements {
		AdapterRequirements::activity_codes()
	}

	async fn quote(&self, snapshot: &ApplicationSnapshot, ctx: &QuoteContext) -> QuoteOutcome {
		debug!(
			"Pie WC quoting application {} via carrier {}",
			snapshot.application_id, ctx.config.carrier_id
		);
		match self.quote_inner(snapshot, ctx).await {
			Ok(outcome) => outcome,
			Err(fault) => outcome_from_fault(&ctx.config.carrier_id, fault),
		}
	}

	async fn price(
		&self,
		snapshot: &ApplicationSnapshot,
		ctx: &QuoteContext,
	) -> AdapterResult<PricingOutcome> {
		debug!(
			"Pie WC pricing application {} via carrier {}",
			snapshot.application_id, ctx.config.carrier_id
		);
		match self.price_inner(snapshot, ctx).await {
			Ok(pricing) => Ok(pricing),
			Err(fault) => Ok(pricing_from_fault(&ctx.config.carrier_id, fault)),
		}
	}
}

fn build_request(
	snapshot: &ApplicationSnapshot,
	ctx: &QuoteContext,
	limits: &LimitTuple,
) -> AdapterResult<PieQuoteRequest> {
	let rules = ResolutionRules::new(BoolTokens::TRUE_FALSE);
	let answers = resolve_answers(snapshot, &ctx.questions, &rules)?
		.into_iter()
		.map(|answer| PieAnswer {
			code: answer.carrier_code,
			value: match answer.value {
				AnswerValue::Bool(token) => serde_json::Value::Bool(token == "true"),
				AnswerValue::Numeric(number) => serde_json::Value::String(number.to_string()),
				AnswerValue::Text(text) => serde_json::Value::String(text),
			},
		})
		.collect();

	let mut locations = Vec::new();
	for location in &snapshot.locations {
		let exposures = location
			.exposures
			.iter()
			.map(|exposure| PieExposure {
				class_code: ctx
					.code_mappings
					.lookup(&exposure.internal_class_code, &location.address.state)
					.unwrap_or_default()
					.to_string(),
				annual_payroll: exposure.annual_payroll,
				employee_count: exposure.employee_count,
			})
			.collect();
		locations.push(PieLocation {
			address_line1: location.address.line1.clone(),
			city: location.address.city.clone(),
			state: location.address.state.clone(),
			zip_code: location.address.zip.clone(),
			exposures,
		});
	}

	Ok(PieQuoteRequest {
		business_name: snapshot.business.legal_name.clone(),
		fein: snapshot.business.fein.clone(),
		legal_entity: entity_code(snapshot.business.entity_type).to_string(),
		effective_date: snapshot.policy.effective_date.to_string(),
		expiration_date: snapshot.policy.expiration_date.to_string(),
		employers_liability_limits: limits.to_string(),
		locations,
		answers,
	})
}

fn entity_code(entity_type: EntityType) -> &'static str {
	match entity_type {
		EntityType::Individual => "individual",
		EntityType::Partnership => "partnership",
		EntityType::Llc => "llc",
		EntityType::Corporation => "corporation",
		EntityType::SCorporation => "s_corporation",
		EntityType::NonProfit => "non_profit",
		EntityType::JointVenture => "joint_venture",
		EntityType::Trust => "trust",
		EntityType::Other => "other",
	}
}

fn classify_quote(
	response: PieQuoteResponse,
	limits: LimitTuple,
) -> AdapterResult<QuoteOutcome> {
	let reasons: Vec<String> = response
		.declinations
		.into_iter()
		.map(|declination| declination.message)
		.collect();

	match response.status.as_str() {
		"quoted" => {
			let premium = response
				.premium
				.ok_or_else(|| AdapterError::InvalidResponse {
					reason: "quoted response without premium".to_string(),
				})?;
			let mut outcome = QuoteOutcome::quoted(premium).with_limits(limits);
			if let Some(quote_id) = response.quote_id {
				outcome = outcome.with_quote_number(quote_id);
			}
			if let Some(portal_url) = response.portal_url {
				outcome = outcome.with_quote_link(portal_url);
			}
			Ok(outcome)
		},
		"declined" => Ok(QuoteOutcome::declined(if reasons.is_empty() {
			vec!["carrier declined the risk".to_string()]
		} else {
			reasons
		})),
		"referred" => Ok(match response.premium {
			Some(premium) => QuoteOutcome::referred_with_price(premium).with_limits(limits),
			None => QuoteOutcome::referred(),
		}),
		other => Err(AdapterError::CarrierError {
			code: other.to_string(),
			message: reasons.join("; "),
		}),
	}
}

fn classify_pricing(response: PiePricingResponse) -> PricingOutcome {
	if !response.eligible {
		let reasons = if response.reasons.is_empty() {
			vec!["risk is outside carrier appetite".to_string()]
		} else {
			response.reasons
		};
		return PricingOutcome::out_of_appetite(reasons);
	}

	match response.premium {
		Some(premium) => PricingOutcome::Priced {
			premium,
			quote_number: response.indication_id,
		},
		None => PricingOutcome::pricing_error(
			"carrier marked the risk eligible but returned no premium".to_string(),
		),
	}
}

// Request payload schema

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PieQuoteRequest {
	business_name: String,
	fein: Option<String>,
	legal_entity: String,
	effective_date: String,
	expiration_date: String,
	employers_liability_limits: String,
	locations: Vec<PieLocation>,
	answers: Vec<PieAnswer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PieLocation {
	address_line1: String,
	city: String,
	state: String,
	zip_code: String,
	exposures: Vec<PieExposure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PieExposure {
	class_code: String,
	annual_payroll: Decimal,
	employee_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PieAnswer {
	code: String,
	value: serde_json::Value,
}

// Response payload schema

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PieQuoteResponse {
	status: String,
	premium: Option<Decimal>,
	quote_id: Option<String>,
	portal_url: Option<String>,
	#[serde(default)]
	declinations: Vec<PieDeclination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PieDeclination {
	message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PiePricingResponse {
	eligible: bool,
	premium: Option<Decimal>,
	indication_id: Option<String>,
	#[serde(default)]
	reasons: Vec<String>,
}
