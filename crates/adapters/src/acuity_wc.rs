//! Acuity Workers' Compensation adapter
//!
//! ACORD-style markup rating service over HTTPS POST with basic auth. The
//! request embeds class exposures per rate state and generic question/answer
//! pairs; the governing classification travels as a structural field, not as
//! a question.

use async_trait::async_trait;
use qwire_types::{
	Adapter, AdapterError, AdapterRequirements, AdapterResult, AnswerValue, ApplicationSnapshot,
	BoolTokens, CarrierLimitSet, EntityType, LimitTuple, QuoteAdapter, QuoteContext, QuoteOutcome,
	ResolutionRules, resolve_answers,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::classify::outcome_from_fault;
use crate::prechecks::{self, PrecheckRules};
use crate::transport::{markup, HttpTransport, MarkupSender, WireAuth};

/// Carrier question code the adapter answers through the governing class
/// field instead of the question list
const GOVERNING_CLASS_QUESTION: &str = "ACU-GOVERNING-CLASS";

const SUPPORTED_ENTITY_TYPES: &[EntityType] = &[
	EntityType::Individual,
	EntityType::Partnership,
	EntityType::Llc,
	EntityType::Corporation,
	EntityType::SCorporation,
	EntityType::NonProfit,
];

/// Acuity WC adapter
#[derive(Debug)]
pub struct AcuityWcAdapter {
	info: Adapter,
	sender: MarkupSender,
	limit_set: CarrierLimitSet,
}

impl AcuityWcAdapter {
	pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
		Self {
			info: Adapter::new("acuity-wc-v1", "Acuity Workers' Compensation", "1.0.0")
				.with_description("ACORD markup rating service"),
			sender: MarkupSender::new(transport),
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
			max_locations: Some(10),
			allow_included_owners: true,
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

		let rules = ResolutionRules::new(BoolTokens::YES_NO)
			.with_handled_elsewhere(&[GOVERNING_CLASS_QUESTION]);
		let answers = resolve_answers(snapshot, &ctx.questions, &rules)?;

		let request = build_request(snapshot, ctx, &limits, answers)?;
		let auth = WireAuth::from_credentials(&ctx.credentials);
		let response = self.sender.post(&ctx.config, auth, &request).await?;

		let document: AcordResponse = match markup::decode(&response.body) {
			Ok(document) => document,
			Err(decode_fault) => {
				// A failed HTTP status with an unparseable body is an HTTP
				// failure; an unparseable 2xx body is a shape failure.
				if response.is_success() {
					return Err(decode_fault);
				}
				return Err(AdapterError::from_http_failure(response.status));
			},
		};

		classify_response(&ctx.config.carrier_id, document, limits)
	}
}

#[async_trait]
impl QuoteAdapter for AcuityWcAdapter {
	fn adapter_info(&self) -> &Adapter {
		&self.info
	}

	fn requirements(&self) -> AdapterRequirements {
		AdapterRequirements::activity_codes()
	}

	async fn quote(&self, snapshot: &ApplicationSnapshot, ctx: &QuoteContext) -> QuoteOutcome {
		debug!(
			"Acuity WC quoting application {} via carrier {}",
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
) -> AdapterResult<AcordRequest> {
	let state = snapshot
		.primary_state()
		.ok_or_else(|| AdapterError::ConfigError {
			reason: "application has no location".to_string(),
		})?;

	let mut classes = Vec::new();
	for location in &snapshot.locations {
		for exposure in &location.exposures {
			let carrier_code = ctx
				.code_mappings
				.lookup(&exposure.internal_class_code, &location.address.state)
				// Pre-checks already proved every mapping exists.
				.unwrap_or_default();
			classes.push(WorkCompClassRq {
				rating_classification_cd: carrier_code.to_string(),
				payroll_amt: exposure.annual_payroll.to_string(),
				num_employees: exposure.employee_count,
			});
		}
	}

	let question_answers = answers
		.into_iter()
		.map(|answer| {
			let mut qa = QuestionAnswerRq {
				question_cd: answer.carrier_code,
				yes_no_cd: None,
				num: None,
				explanation: None,
			};
			match answer.value {
				AnswerValue::Bool(token) => qa.yes_no_cd = Some(token.to_string()),
				AnswerValue::Numeric(number) => qa.num = Some(number.to_string()),
				AnswerValue::Text(text) => qa.explanation = Some(text),
			}
			qa
		})
		.collect();

	Ok(AcordRequest {
		signon: SignonRq {
			client_app: ClientApp {
				name: "quotewire".to_string(),
				version: env!("CARGO_PKG_VERSION").to_string(),
			},
		},
		svc: InsuranceSvcRq {
			rq_uid: Uuid::new_v4().to_string(),
			work_comp: WorkCompPolicyQuoteInqRq {
				transaction_effective_dt: snapshot.policy.effective_date.to_string(),
				insured: InsuredOrPrincipal {
					commercial_name: snapshot.business.legal_name.clone(),
					legal_entity_cd: entity_code(snapshot.business.entity_type).to_string(),
					fein: snapshot.business.fein.clone(),
				},
				policy: CommlPolicy {
					lob_cd: "WORK".to_string(),
					effective_dt: snapshot.policy.effective_date.to_string(),
					expiration_dt: snapshot.policy.expiration_date.to_string(),
					employers_liability_limits: limits.to_string(),
				},
				locations: snapshot
					.locations
					.iter()
					.map(|location| LocationRq {
						addr1: location.address.line1.clone(),
						city: location.address.city.clone(),
						state_prov_cd: location.address.state.clone(),
						postal_code: location.address.zip.clone(),
					})
					.collect(),
				line: WorkCompLineBusiness {
					rate_states: vec![WorkCompRateState {
						state_prov_cd: state.to_string(),
						classes,
					}],
				},
				question_answers,
			},
		},
	})
}

fn entity_code(entity_type: EntityType) -> &'static str {
	match entity_type {
		EntityType::Individual => "IN",
		EntityType::Partnership => "PT",
		EntityType::Llc => "LL",
		EntityType::Corporation => "CP",
		EntityType::SCorporation => "SS",
		EntityType::NonProfit => "NP",
		EntityType::JointVenture => "JV",
		EntityType::Trust => "TR",
		EntityType::Other => "OT",
	}
}

fn classify_response(
	carrier_id: &str,
	document: AcordResponse,
	limits: LimitTuple,
) -> AdapterResult<QuoteOutcome> {
	let response = document.svc.work_comp;
	let status_cd = response.msg_status.msg_status_cd.to_ascii_lowercase();

	match status_cd.as_str() {
		"success" => {
			let summary = response
				.summary
				.ok_or_else(|| AdapterError::InvalidResponse {
					reason: "success response without PolicySummaryInfo".to_string(),
				})?;
			classify_summary(summary, limits)
		},
		"error" | "dataerror" => {
			let extended = &response.msg_status.extended_status;
			if extended.iter().any(|status| {
				matches!(
					status.extended_status_cd.as_str(),
					"SystemUnavailable" | "ServiceUnavailable"
				)
			}) {
				return Ok(QuoteOutcome::outage(format!(
					"carrier {} reported its rating system is unavailable",
					carrier_id
				)));
			}
			let first = extended.first();
			Err(AdapterError::CarrierError {
				code: first
					.map(|status| status.extended_status_cd.clone())
					.unwrap_or_else(|| status_cd.clone()),
				message: first
					.and_then(|status| status.extended_status_desc.clone())
					.or(response.msg_status.msg_status_desc)
					.unwrap_or_default(),
			})
		},
		other => Err(AdapterError::InvalidResponse {
			reason: format!("unknown MsgStatusCd '{}'", other),
		}),
	}
}

fn classify_summary(
	summary: PolicySummaryInfo,
	limits: LimitTuple,
) -> AdapterResult<QuoteOutcome> {
	let premium = summary
		.full_term_amt
		.as_ref()
		.map(|amt| parse_amount(&amt.amt))
		.transpose()?;

	match summary.policy_status_cd.to_ascii_lowercase().as_str() {
		"quoted" | "accept" => {
			let premium = premium.ok_or_else(|| AdapterError::InvalidResponse {
				reason: "quoted response without FullTermAmt".to_string(),
			})?;
			let mut outcome = QuoteOutcome::quoted(premium).with_limits(limits);
			if let Some(quote_number) = summary.policy_number {
				outcome = outcome.with_quote_number(quote_number);
			}
			if let Some(link) = summary.url {
				outcome = outcome.with_quote_link(link);
			}
			Ok(outcome)
		},
		"referred" | "referral" => Ok(match premium {
			Some(premium) => QuoteOutcome::referred_with_price(premium).with_limits(limits),
			None => QuoteOutcome::referred(),
		}),
		"declined" | "rejected" => {
			let mut reasons: Vec<String> = summary
				.decline_reasons
				.into_iter()
				.map(|reason| reason.reason_desc)
				.collect();
			if reasons.is_empty() {
				reasons.push("carrier declined the risk".to_string());
			}
			Ok(QuoteOutcome::declined(reasons))
		},
		other => Err(AdapterError::InvalidResponse {
			reason: format!("unknown PolicyStatusCd '{}'", other),
		}),
	}
}

fn parse_amount(raw: &str) -> AdapterResult<Decimal> {
	Decimal::from_str(raw.trim()).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("unparseable premium amount '{}': {}", raw, e),
	})
}

// Request document schema

#[derive(Debug, Serialize)]
#[serde(rename = "ACORD")]
struct AcordRequest {
	#[serde(rename = "SignonRq")]
	signon: SignonRq,
	#[serde(rename = "InsuranceSvcRq")]
	svc: InsuranceSvcRq,
}

#[derive(Debug, Serialize)]
struct SignonRq {
	#[serde(rename = "ClientApp")]
	client_app: ClientApp,
}

#[derive(Debug, Serialize)]
struct ClientApp {
	#[serde(rename = "Name")]
	name: String,
	#[serde(rename = "Version")]
	version: String,
}

#[derive(Debug, Serialize)]
struct InsuranceSvcRq {
	#[serde(rename = "RqUID")]
	rq_uid: String,
	#[serde(rename = "WorkCompPolicyQuoteInqRq")]
	work_comp: WorkCompPolicyQuoteInqRq,
}

#[derive(Debug, Serialize)]
struct WorkCompPolicyQuoteInqRq {
	#[serde(rename = "TransactionEffectiveDt")]
	transaction_effective_dt: String,
	#[serde(rename = "InsuredOrPrincipal")]
	insured: InsuredOrPrincipal,
	#[serde(rename = "CommlPolicy")]
	policy: CommlPolicy,
	#[serde(rename = "Location")]
	locations: Vec<LocationRq>,
	#[serde(rename = "WorkCompLineBusiness")]
	line: WorkCompLineBusiness,
	#[serde(rename = "QuestionAnswer")]
	question_answers: Vec<QuestionAnswerRq>,
}

#[derive(Debug, Serialize)]
struct InsuredOrPrincipal {
	#[serde(rename = "CommercialName")]
	commercial_name: String,
	#[serde(rename = "LegalEntityCd")]
	legal_entity_cd: String,
	#[serde(rename = "FEIN")]
	fein: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommlPolicy {
	#[serde(rename = "LOBCd")]
	lob_cd: String,
	#[serde(rename = "EffectiveDt")]
	effective_dt: String,
	#[serde(rename = "ExpirationDt")]
	expiration_dt: String,
	#[serde(rename = "EmployersLiabilityLimits")]
	employers_liability_limits: String,
}

#[derive(Debug, Serialize)]
struct LocationRq {
	#[serde(rename = "Addr1")]
	addr1: String,
	#[serde(rename = "City")]
	city: String,
	#[serde(rename = "StateProvCd")]
	state_prov_cd: String,
	#[serde(rename = "PostalCode")]
	postal_code: String,
}

#[derive(Debug, Serialize)]
struct WorkCompLineBusiness {
	#[serde(rename = "WorkCompRateState")]
	rate_states: Vec<WorkCompRateState>,
}

#[derive(Debug, Serialize)]
struct WorkCompRateState {
	#[serde(rename = "StateProvCd")]
	state_prov_cd: String,
	#[serde(rename = "WorkCompClass")]
	classes: Vec<WorkCompClassRq>,
}

#[derive(Debug, Serialize)]
struct WorkCompClassRq {
	#[serde(rename = "RatingClassificationCd")]
	rating_classification_cd: String,
	#[serde(rename = "PayrollAmt")]
	payroll_amt: String,
	#[serde(rename = "NumEmployees")]
	num_employees: u32,
}

#[derive(Debug, Serialize)]
struct QuestionAnswerRq {
	#[serde(rename = "QuestionCd")]
	question_cd: String,
	#[serde(rename = "YesNoCd")]
	yes_no_cd: Option<String>,
	#[serde(rename = "Num")]
	num: Option<String>,
	#[serde(rename = "Explanation")]
	explanation: Option<String>,
}

// Response document schema

#[derive(Debug, Deserialize)]
#[serde(rename = "ACORD")]
struct AcordResponse {
	#[serde(rename = "InsuranceSvcRs")]
	svc: InsuranceSvcRs,
}

#[derive(Debug, Deserialize)]
struct InsuranceSvcRs {
	#[serde(rename = "WorkCompPolicyQuoteInqRs")]
	work_comp: WorkCompPolicyQuoteInqRs,
}

#[derive(Debug, Deserialize)]
struct WorkCompPolicyQuoteInqRs {
	#[serde(rename = "MsgStatus")]
	msg_status: MsgStatus,
	#[serde(rename = "PolicySummaryInfo")]
	summary: Option<PolicySummaryInfo>,
}

#[derive(Debug, Deserialize)]
struct MsgStatus {
	#[serde(rename = "MsgStatusCd")]
	msg_status_cd: String,
	#[serde(rename = "MsgStatusDesc")]
	msg_status_desc: Option<String>,
	#[serde(rename = "ExtendedStatus", default)]
	extended_status: Vec<ExtendedStatus>,
}

#[derive(Debug, Deserialize)]
struct ExtendedStatus {
	#[serde(rename = "ExtendedStatusCd")]
	extended_status_cd: String,
	#[serde(rename = "ExtendedStatusDesc")]
	extended_status_desc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PolicySummaryInfo {
	#[serde(rename = "PolicyStatusCd")]
	policy_status_cd: String,
	#[serde(rename = "PolicyNumber")]
	policy_number: Option<String>,
	#[serde(rename = "FullTermAmt")]
	full_term_amt: Option<AmtElement>,
	#[serde(rename = "URL")]
	url: Option<String>,
	#[serde(rename = "DeclineReason", default)]
	decline_reasons: Vec<DeclineReason>,
}

#[derive(Debug, Deserialize)]
struct AmtElement {
	#[serde(rename = "Amt")]
	amt: String,
}

#[derive(Debug, Deserialize)]
struct DeclineReason {
	#[serde(rename = "ReasonDesc")]
	reason_desc: String,
}
