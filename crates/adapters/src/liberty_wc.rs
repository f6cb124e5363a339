//! Liberty Workers' Compensation adapter
//!
//! Bespoke markup API authenticated with a static API key header. Liberty
//! uses single-letter yes/no tokens, caps the number of locations, refuses
//! policies covering included owners, and attaches a base64 quote letter to
//! successful quotes.

use async_trait::async_trait;
use qwire_types::{
	Adapter, AdapterError, AdapterRequirements, AdapterResult, AnswerValue, ApplicationSnapshot,
	BoolTokens, CarrierLimitSet, EntityType, LetterAttachment, LimitTuple, QuoteAdapter,
	QuoteContext, QuoteOutcome, ResolutionRules, resolve_answers,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::classify::outcome_from_fault;
use crate::prechecks::{self, PrecheckRules};
use crate::transport::{markup, HttpTransport, MarkupSender, WireAuth};

const SUPPORTED_ENTITY_TYPES: &[EntityType] = &[
	EntityType::Individual,
	EntityType::Partnership,
	EntityType::Llc,
	EntityType::Corporation,
	EntityType::SCorporation,
];

/// Liberty WC adapter
#[derive(Debug)]
pub struct LibertyWcAdapter {
	info: Adapter,
	sender: MarkupSender,
	limit_set: CarrierLimitSet,
}

impl LibertyWcAdapter {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			info: Adapter::new("liberty-wc-v1", "Liberty Workers' Compensation", "1.0.0")
				.with_description("Bespoke markup quoting API"),
			sender: MarkupSender::new(transport),
			limit_set: CarrierLimitSet::new(vec![
				LimitTuple::new(vec![100_000, 500_000, 100_000]),
				LimitTuple::new(vec![500_000, 500_000, 500_000]),
				LimitTuple::new(vec![1_000_000, 1_000_000, 1_000_000]),
				LimitTuple::new(vec![2_000_000, 2_000_000, 2_000_000]),
			]),
		}
	}

	fn precheck_rules(&self) -> PrecheckRules {
		PrecheckRules {
			supported_entity_types: SUPPORTED_ENTITY_TYPES,
			max_locations: Some(3),
			allow_included_owners: false,
			requires_class_mappings: true,
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

		let limits = match self.limit_set.negotiate(&snapshot.policy.requested_limits) {
			Ok(limits) => limits.clone(),
			Err(fault) => return Ok(QuoteOutcome::autodeclined(vec![fault.to_string()])),
		};

		let rules = ResolutionRules::new(BoolTokens::Y_N);
		let answers = resolve_answers(snapshot, &ctx.questions, &rules)?;

		let request = build_request(snapshot, ctx, &limits, answers)?;
		let auth = WireAuth::from_credentials(&ctx.credentials);
		let response = self.sender.post(&ctx.config, auth, &request).await?;

		if !response.is_success() {
			return Err(AdapterError::from_http_failure(response.status));
		}

		let document: LibertyResponse = markup::decode(&response.body)?;
		classify_response(document, limits)
	}
}

#[async_trait]
impl QuoteAdapter for LibertyWcAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.info
	}

	fn requirements(&self) -> AdapterRequirements {
		AdapterRequirements::activity_codes()
	}

	async fn quote(&self, snapshot: &ApplicationSnapshot, ctx: &QuoteContext) -> QuoteOutcome {
		debug!(
			"Liberty WC quoting application {} via carrier {}",
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
	answers: Vec<qwire_types::ResolvedAnswer>,
) -> AdapterResult<LibertyRequest> {
	let mut locations = Vec::new();
	for location in &snapshot.locations {
		let mut classes = Vec::new();
		for exposure in &location.exposures {
			let class_code = ctx
				.code_mappings
				.lookup(&exposure.internal_class_code, &location.address.state)
				.unwrap_or_default();
			classes.push(ClassExposureRq {
				class_code: class_code.to_string(),
				payroll: exposure.annual_payroll.to_string(),
				employees: exposure.employee_count,
			});
		}
		locations.push(RiskLocationRq {
			street: location.address.line1.clone(),
			city: location.address.city.clone(),
			state: location.address.state.clone(),
			zip: location.address.zip.clone(),
			classes,
		});
	}

	let risk_answers = answers
		.into_iter()
		.map(|answer| AnswerRq {
			code: answer.carrier_code,
			value: match answer.value {
				AnswerValue::Bool(token) => token.to_string(),
				AnswerValue::Numeric(number) => number.to_string(),
				AnswerValue::Text(text) => text,
			},
		})
		.collect();

	Ok(LibertyRequest {
		insured: InsuredRq {
			name: snapshot.business.legal_name.clone(),
			entity_type: entity_code(snapshot.business.entity_type).to_string(),
			fein: snapshot.business.fein.clone(),
			years_in_business: snapshot.business.years_in_business,
		},
		policy: PolicyRq {
			line: "WC".to_string(),
			effective: snapshot.policy.effective_date.to_string(),
			expiration: snapshot.policy.expiration_date.to_string(),
			el_limits: limits.to_string(),
		},
		locations,
		risk_answers,
	})
}

fn entity_code(entity_type: EntityType) -> &'static str {
	match entity_type {
		EntityType::Individual => "INDIVIDUAL",
		EntityType::Partnership => "PARTNERSHIP",
		EntityType::Llc => "LLC",
		EntityType::Corporation => "CORPORATION",
		EntityType::SCorporation => "SCORP",
		EntityType::NonProfit => "NONPROFIT",
		EntityType::JointVenture => "JOINTVENTURE",
		EntityType::Trust => "TRUST",
		EntityType::Other => "OTHER",
	}
}

fn classify_response(document: LibertyResponse, limits: LimitTuple) -> AdapterResult<QuoteOutcome> {
	match document.result_code.to_ascii_uppercase().as_str() {
		"SUCCESS" => classify_quote(document, limits),
		"REJECTED" => {
			let mut reasons = document.messages;
			if reasons.is_empty() {
				reasons.push("carrier declined the risk".to_string());
			}
			Ok(QuoteOutcome::declined(reasons))
		},
		"UNAVAILABLE" => Err(AdapterError::from_http_failure(503)),
		other => Err(AdapterError::CarrierError {
			code: other.to_string(),
			message: document.messages.join("; "),
		}),
	}
}

fn classify_quote(document: LibertyResponse, limits: LimitTuple) -> AdapterResult<QuoteOutcome> {
	let quote = document.quote.ok_or_else(|| AdapterError::InvalidResponse {
		reason: "SUCCESS response without Quote element".to_string(),
	})?;

	let premium = quote
		.total_premium
		.as_deref()
		.map(parse_amount)
		.transpose()?;

	let mut outcome = match quote.disposition.to_ascii_uppercase().as_str() {
		"QUOTED" => {
			let premium = premium.ok_or_else(|| AdapterError::InvalidResponse {
				reason: "quoted disposition without TotalPremium".to_string(),
			})?;
			QuoteOutcome::quoted(premium).with_limits(limits)
		},
		"REFERRED" => match premium {
			Some(premium) => QuoteOutcome::referred_with_price(premium).with_limits(limits),
			None => QuoteOutcome::referred(),
		},
		other => {
			return Err(AdapterError::InvalidResponse {
				reason: format!("unknown quote disposition '{}'", other),
			});
		},
	};

	if let Some(quote_number) = quote.quote_number {
		outcome = outcome.with_quote_number(quote_number);
	}
	if let Some(letter) = quote.letter {
		// Letter extraction failure does not sink an otherwise good quote.
		match extract_letter(letter) {
			Some(attachment) => outcome = outcome.with_letter(attachment),
			None => warn!("Quote letter present but incomplete; continuing without it"),
		}
	}
	Ok(outcome)
}

fn extract_letter(letter: QuoteLetterRs) -> Option<LetterAttachment> {
	let data = letter.data?;
	if data.trim().is_empty() {
		return None;
	}
	Some(LetterAttachment {
		file_name: letter
			.file_name
			.unwrap_or_else(|| "quote-letter.pdf".to_string()),
		content_type: letter
			.content_type
			.unwrap_or_else(|| "application/pdf".to_string()),
		data,
	})
}

fn parse_amount(raw: &str) -> AdapterResult<Decimal> {
	Decimal::from_str(raw.trim()).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("unparseable premium amount '{}': {}", raw, e),
	})
}

// Request document schema

#[derive(Debug, Serialize)]
#[serde(rename = "QuoteRequest")]
struct LibertyRequest {
	#[serde(rename = "Insured")]
	insured: InsuredRq,
	#[serde(rename = "Policy")]
	policy: PolicyRq,
	#[serde(rename = "RiskLocation")]
	locations: Vec<RiskLocationRq>,
	#[serde(rename = "RiskAnswer")]
	risk_answers: Vec<AnswerRq>,
}

#[derive(Debug, Serialize)]
struct InsuredRq {
	#[serde(rename = "Name")]
	name: String,
	#[serde(rename = "EntityType")]
	entity_type: String,
	#[serde(rename = "FEIN")]
	fein: Option<String>,
	#[serde(rename = "YearsInBusiness")]
	years_in_business: Option<u32>,
}

#[derive(Debug, Serialize)]
struct PolicyRq {
	#[serde(rename = "Line")]
	line: String,
	#[serde(rename = "EffectiveDate")]
	effective: String,
	#[serde(rename = "ExpirationDate")]
	expiration: String,
	#[serde(rename = "EmployersLiabilityLimits")]
	el_limits: String,
}

#[derive(Debug, Serialize)]
struct RiskLocationRq {
	#[serde(rename = "Street")]
	street: String,
	#[serde(rename = "City")]
	city: String,
	#[serde(rename = "State")]
	state: String,
	#[serde(rename = "Zip")]
	zip: String,
	#[serde(rename = "ClassExposure")]
	classes: Vec<ClassExposureRq>,
}

#[derive(Debug, Serialize)]
struct ClassExposureRq {
	#[serde(rename = "ClassCode")]
	class_code: String,
	#[serde(rename = "Payroll")]
	payroll: String,
	#[serde(rename = "Employees")]
	employees: u32,
}

#[derive(Debug, Serialize)]
struct AnswerRq {
	#[serde(rename = "Code")]
	code: String,
	#[serde(rename = "Value")]
	value: String,
}

// Response document schema

#[derive(Debug, Deserialize)]
#[serde(rename = "QuoteResponse")]
struct LibertyResponse {
	#[serde(rename = "ResultCode")]
	result_code: String,
	#[serde(rename = "Message", default)]
	messages: Vec<String>,
	#[serde(rename = "Quote")]
	quote: Option<QuoteRs>,
}

#[derive(Debug, Deserialize)]
struct QuoteRs {
	#[serde(rename = "Disposition")]
	disposition: String,
	#[serde(rename = "QuoteNumber")]
	quote_number: Option<String>,
	#[serde(rename = "TotalPremium")]
	total_premium: Option<String>,
	#[serde(rename = "QuoteLetter")]
	letter: Option<QuoteLetterRs>,
}

#[derive(Debug, Deserialize)]
struct QuoteLetterRs {
	#[serde(rename = "FileName")]
	file_name: Option<String>,
	#[serde(rename = "ContentType")]
	content_type: Option<String>,
	#[serde(rename = "Data")]
	data: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use qwire_types::QuoteStatus;
	use rust_decimal_macros::dec;

	fn limits() -> LimitTuple {
		LimitTuple::new(vec![500_000, 500_000, 500_000])
	}

	#[test]
	fn test_classify_quoted_with_letter() {
		let body = "<QuoteResponse><ResultCode>SUCCESS</ResultCode>\
			<Quote><Disposition>QUOTED</Disposition>\
			<QuoteNumber>LIB-77</QuoteNumber>\
			<TotalPremium>2150.00</TotalPremium>\
			<QuoteLetter><FileName>quote.pdf</FileName>\
			<ContentType>application/pdf</ContentType>\
			<Data>JVBERi0xLjQ=</Data></QuoteLetter>\
			</Quote></QuoteResponse>";
		let document: LibertyResponse = markup::decode(body).unwrap();
		let outcome = classify_response(document, limits()).unwrap();

		assert_eq!(outcome.status, QuoteStatus::Quoted);
		assert_eq!(outcome.premium, Some(dec!(2150.00)));
		assert_eq!(outcome.letter.as_ref().unwrap().file_name, "quote.pdf");
		assert!(outcome.validate().is_ok());
	}

	#[test]
	fn test_incomplete_letter_does_not_sink_quote() {
		let body = "<QuoteResponse><ResultCode>SUCCESS</ResultCode>\
			<Quote><Disposition>QUOTED</Disposition>\
			<TotalPremium>980.00</TotalPremium>\
			<QuoteLetter><FileName>quote.pdf</FileName></QuoteLetter>\
			</Quote></QuoteResponse>";
		let document: LibertyResponse = markup::decode(body).unwrap();
		let outcome = classify_response(document, limits()).unwrap();

		assert_eq!(outcome.status, QuoteStatus::Quoted);
		assert!(outcome.letter.is_none());
	}

	#[test]
	fn test_classify_rejected_keeps_messages() {
		let body = "<QuoteResponse><ResultCode>REJECTED</ResultCode>\
			<Message>Class 5551 outside appetite</Message>\
			<Message>Prior claim frequency too high</Message>\
			</QuoteResponse>";
		let document: LibertyResponse = markup::decode(body).unwrap();
		let outcome = classify_response(document, limits()).unwrap();

		assert_eq!(outcome.status, QuoteStatus::Declined);
		assert_eq!(outcome.reasons.len(), 2);
		assert!(outcome.premium.is_none());
	}

	#[test]
	fn test_carrier_unavailable_surfaces_as_outage_fault() {
		let body = "<QuoteResponse><ResultCode>UNAVAILABLE</ResultCode></QuoteResponse>";
		let document: LibertyResponse = markup::decode(body).unwrap();
		let err = classify_response(document, limits()).unwrap_err();
		assert!(err.is_outage());
	}

	#[test]
	fn test_referred_without_premium() {
		let body = "<QuoteResponse><ResultCode>SUCCESS</ResultCode>\
			<Quote><Disposition>REFERRED</Disposition></Quote></QuoteResponse>";
		let document: LibertyResponse = markup::decode(body).unwrap();
		let outcome = classify_response(document, limits()).unwrap();
		assert_eq!(outcome.status, QuoteStatus::Referred);
		assert!(outcome.premium.is_none());
	}
}
