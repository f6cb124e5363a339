//! End-to-end adapter flows against a scripted transport
//!
//! Exercises the full path from application snapshot through pre-checks,
//! limit negotiation and question resolution to wire request and outcome
//! classification, without touching the network.

mod mocks;

use mocks::{
	bakery_snapshot, mixed_question_catalog, snapshot_with_answers, snapshot_with_limits,
	wc_mappings,
};
use quotewire::adapters::transport::WireAuth;
use quotewire::adapters::{AcuityWcAdapter, PieWcAdapter};
use quotewire::mocks::StubTransport;
use quotewire::types::{
	AdapterError, CarrierCredentials, CarrierRuntimeConfig, LimitTuple, QuoteAdapter, QuoteContext,
	QuoteStatus,
};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn acuity_ctx() -> QuoteContext {
	QuoteContext::new(
		CarrierRuntimeConfig::new(
			"acuity-wc".to_string(),
			"https://sandbox.acuity.example.com/ws/rating".to_string(),
			5_000,
		),
		CarrierCredentials::basic("agency-42", "hunter2"),
	)
	.with_code_mappings(wc_mappings())
	.with_questions(mixed_question_catalog())
}

fn pie_ctx() -> QuoteContext {
	QuoteContext::new(
		CarrierRuntimeConfig::new(
			"pie-wc".to_string(),
			"https://sandbox.pie.example.com/api/v1/quotes".to_string(),
			5_000,
		),
		CarrierCredentials::oauth2("client-1", "s3cret", "/oauth/token"),
	)
	.with_code_mappings(wc_mappings())
	.with_questions(mixed_question_catalog())
}

fn acuity_quoted_body(premium: &str) -> String {
	format!(
		"<ACORD><InsuranceSvcRs><WorkCompPolicyQuoteInqRs>\
		 <MsgStatus><MsgStatusCd>Success</MsgStatusCd></MsgStatus>\
		 <PolicySummaryInfo><PolicyStatusCd>quoted</PolicyStatusCd>\
		 <PolicyNumber>WC-1001</PolicyNumber>\
		 <FullTermAmt><Amt>{}</Amt></FullTermAmt>\
		 </PolicySummaryInfo>\
		 </WorkCompPolicyQuoteInqRs></InsuranceSvcRs></ACORD>",
		premium
	)
}

#[tokio::test]
async fn quoted_flow_negotiates_limits_and_carries_premium() {
	let transport = Arc::new(StubTransport::new().with_response(200, &acuity_quoted_body("4321.50")));
	let adapter = AcuityWcAdapter::new(transport.clone());

	let outcome = adapter.quote(&bakery_snapshot(), &acuity_ctx()).await;

	assert_eq!(outcome.status, QuoteStatus::Quoted);
	assert_eq!(outcome.premium, Some(dec!(4321.50)));
	assert_eq!(outcome.quote_number.as_deref(), Some("WC-1001"));
	assert_eq!(
		outcome.limits,
		Some(LimitTuple::new(vec![500_000, 500_000, 500_000]))
	);
	assert!(outcome.validate().is_ok());
	assert_eq!(transport.call_count(), 1);

	// Basic auth from the attempt credentials reaches the wire.
	let request = &transport.recorded_requests()[0];
	assert!(matches!(request.auth, WireAuth::Basic { .. }));
}

#[tokio::test]
async fn requested_limits_between_tuples_upgrade_to_next_supported() {
	let transport = Arc::new(StubTransport::new().with_response(200, &acuity_quoted_body("5100.00")));
	let adapter = AcuityWcAdapter::new(transport.clone());

	// 200k per-accident exceeds the carrier floor's first component, so the
	// next tuple up is quoted.
	let snapshot = snapshot_with_limits(LimitTuple::new(vec![200_000, 400_000, 200_000]));
	let outcome = adapter.quote(&snapshot, &acuity_ctx()).await;

	assert_eq!(outcome.status, QuoteStatus::Quoted);
	assert_eq!(
		outcome.limits,
		Some(LimitTuple::new(vec![500_000, 500_000, 500_000]))
	);

	let body = transport.request_body(0);
	assert!(body.contains("500000/500000/500000"));
}

#[tokio::test]
async fn limits_above_carrier_maximum_autodecline_without_network_call() {
	let transport = Arc::new(StubTransport::new());
	let adapter = AcuityWcAdapter::new(transport.clone());

	let snapshot = snapshot_with_limits(LimitTuple::new(vec![5_000_000, 5_000_000, 5_000_000]));
	let outcome = adapter.quote(&snapshot, &acuity_ctx()).await;

	assert_eq!(outcome.status, QuoteStatus::Autodeclined);
	assert!(!outcome.reasons.is_empty());
	assert!(outcome.premium.is_none());
	assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn missing_class_mapping_autodeclines_without_network_call() {
	let transport = Arc::new(StubTransport::new());
	let adapter = AcuityWcAdapter::new(transport.clone());

	let ctx = QuoteContext::new(
		CarrierRuntimeConfig::new(
			"acuity-wc".to_string(),
			"https://sandbox.acuity.example.com/ws/rating".to_string(),
			5_000,
		),
		CarrierCredentials::basic("agency-42", "hunter2"),
	);
	let outcome = adapter.quote(&bakery_snapshot(), &ctx).await;

	assert_eq!(outcome.status, QuoteStatus::Autodeclined);
	assert!(outcome.reasons[0].contains("retail-bakery"));
	assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn carrier_rejection_becomes_declined_with_reasons() {
	let body = "<ACORD><InsuranceSvcRs><WorkCompPolicyQuoteInqRs>\
		<MsgStatus><MsgStatusCd>Success</MsgStatusCd></MsgStatus>\
		<PolicySummaryInfo><PolicyStatusCd>declined</PolicyStatusCd>\
		<DeclineReason><ReasonDesc>Class outside appetite</ReasonDesc></DeclineReason>\
		</PolicySummaryInfo>\
		</WorkCompPolicyQuoteInqRs></InsuranceSvcRs></ACORD>";
	let transport = Arc::new(StubTransport::new().with_response(200, body));
	let adapter = AcuityWcAdapter::new(transport);

	let outcome = adapter.quote(&bakery_snapshot(), &acuity_ctx()).await;

	assert_eq!(outcome.status, QuoteStatus::Declined);
	assert_eq!(outcome.reasons, vec!["Class outside appetite"]);
	assert!(outcome.premium.is_none());
}

#[tokio::test]
async fn transport_timeout_becomes_error_outcome() {
	let transport =
		Arc::new(StubTransport::new().with_fault(AdapterError::Timeout { timeout_ms: 5_000 }));
	let adapter = AcuityWcAdapter::new(transport);

	let outcome = adapter.quote(&bakery_snapshot(), &acuity_ctx()).await;

	assert_eq!(outcome.status, QuoteStatus::Error);
	assert!(!outcome.reasons.is_empty());
	assert!(outcome.premium.is_none());
}

#[tokio::test]
async fn gateway_unavailable_becomes_outage_outcome() {
	let transport =
		Arc::new(StubTransport::new().with_response(503, "<html>service unavailable</html>"));
	let adapter = AcuityWcAdapter::new(transport);

	let outcome = adapter.quote(&bakery_snapshot(), &acuity_ctx()).await;

	assert_eq!(outcome.status, QuoteStatus::Outage);
	assert!(!outcome.reasons.is_empty());
}

#[tokio::test]
async fn unmapped_question_never_reaches_the_wire() {
	let transport = Arc::new(StubTransport::new().with_response(200, &acuity_quoted_body("900.00")));
	let adapter = AcuityWcAdapter::new(transport.clone());

	// Both questions are answered; only the mapped one may be sent.
	let snapshot = snapshot_with_answers(vec![("q-hazmat", "yes"), ("q-internal-only", "yes")]);
	let outcome = adapter.quote(&snapshot, &acuity_ctx()).await;

	assert_eq!(outcome.status, QuoteStatus::Quoted);
	let body = transport.request_body(0);
	assert!(body.contains("CQ-HAZMAT"));
	assert!(!body.contains("q-internal-only"));
}

#[tokio::test]
async fn oauth_token_is_exchanged_then_cached() {
	let token_body = r#"{"access_token": "tok-1", "token_type": "Bearer", "expires_in": 3600}"#;
	let quote_body = r#"{"status": "quoted", "premium": 2210.00, "quoteId": "PIE-9"}"#;
	let transport = Arc::new(
		StubTransport::new()
			.with_response(200, token_body)
			.with_response(200, quote_body)
			.with_response(200, quote_body),
	);
	let adapter = PieWcAdapter::new(transport.clone());
	let snapshot = bakery_snapshot();
	let ctx = pie_ctx();

	let first = adapter.quote(&snapshot, &ctx).await;
	assert_eq!(first.status, QuoteStatus::Quoted);

	let second = adapter.quote(&snapshot, &ctx).await;
	assert_eq!(second.status, QuoteStatus::Quoted);

	// One token exchange and two quote calls: the second quote reuses the
	// cached token.
	assert_eq!(transport.call_count(), 3);
	let requests = transport.recorded_requests();
	assert!(requests[0].url.ends_with("/oauth/token"));
	assert!(matches!(requests[1].auth, WireAuth::Bearer(_)));
	assert!(matches!(requests[2].auth, WireAuth::Bearer(_)));
}

#[tokio::test]
async fn pricing_triad_covers_all_arms() {
	let token_body = r#"{"access_token": "tok-1", "expires_in": 3600}"#;
	let priced_body = r#"{"eligible": true, "premium": 1875.00, "indicationId": "IND-1"}"#;
	let transport = Arc::new(
		StubTransport::new()
			.with_response(200, token_body)
			.with_response(200, priced_body),
	);
	let adapter = PieWcAdapter::new(transport);

	let pricing = adapter.price(&bakery_snapshot(), &pie_ctx()).await.unwrap();
	assert!(pricing.got_pricing());
	assert_eq!(pricing.premium(), Some(dec!(1875.00)));

	// A transport fault surfaces through the triad's error arm, never Err.
	let failing = Arc::new(
		StubTransport::new()
			.with_response(200, token_body)
			.with_fault(AdapterError::Connection("refused".to_string())),
	);
	let adapter = PieWcAdapter::new(failing);
	let pricing = adapter.price(&bakery_snapshot(), &pie_ctx()).await.unwrap();
	assert!(pricing.is_pricing_error());
}
