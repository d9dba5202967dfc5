// system-tests/tests/suites/stub_contract.rs
// ============================================================================
// Module: Stub Contract Tests
// Description: Process scenarios and failure reporting against the stub.
// Purpose: Prove each criterion is checked independently and fails loudly.
// Dependencies: system-tests helpers, server-a-contract
// ============================================================================

//! Stub-backed process API scenarios; each test owns its stub and client.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::net::TcpListener;

use helpers::context::ScenarioContext;
use helpers::recorder::Exchange;
use helpers::scenarios;
use helpers::scenarios::MOCK_RESULT_MARKER;
use helpers::scenarios::ScenarioResult;
use helpers::scenarios::run_scenario;
use helpers::server_stub::ServerStubHandle;
use helpers::server_stub::StubBehavior;
use helpers::server_stub::spawn_qa_stub;
use helpers::server_stub::spawn_server_stub;
use serde_json::json;
use server_a_contract::ClientError;
use server_a_contract::ContractViolation;
use server_a_contract::ProcessRequest;

use crate::helpers;

/// Starts a QA stub and a context pointed at it.
fn qa_context() -> Result<(ServerStubHandle, ScenarioContext), String> {
    let stub = spawn_qa_stub()?;
    let context = ScenarioContext::for_base_url(stub.base_url())?;
    Ok((stub, context))
}

/// Starts a fixed-reply stub and a context pointed at it.
fn fixed_context(
    status: u16,
    environment: Option<&str>,
    body: &str,
) -> Result<(ServerStubHandle, ScenarioContext), String> {
    let stub = spawn_server_stub(StubBehavior::Fixed {
        status,
        environment: environment.map(str::to_string),
        body: body.to_string(),
    })?;
    let context = ScenarioContext::for_base_url(stub.base_url())?;
    Ok((stub, context))
}

/// Returns the `userId` of each recorded request.
fn user_ids(exchanges: &[Exchange]) -> Vec<&str> {
    exchanges.iter().filter_map(|exchange| exchange.request["userId"].as_str()).collect()
}

// ============================================================================
// SECTION: Healthy Service
// ============================================================================

#[test]
fn stub_baseline_scenario_passes() -> ScenarioResult<()> {
    let (stub, context) = qa_context()?;
    let exchanges = run_scenario("stub_baseline_scenario_passes", &context, |recorder| {
        let decoded = scenarios::baseline_success(recorder)?;
        assert!(decoded.result.contains(MOCK_RESULT_MARKER));
        assert_eq!(decoded.result, "Mock response for query: test query");
        Ok("baseline scenario passed against stub".to_string())
    })?;
    assert_eq!(stub.requests(), vec![json!({"userId": "test-user-123", "query": "test query"})]);
    assert_eq!(exchanges[0].status, Some(200));
    assert_eq!(exchanges[0].environment.as_deref(), Some("qa"));
    Ok(())
}

#[test]
fn stub_alternate_user_scenario_passes() -> ScenarioResult<()> {
    let (stub, context) = qa_context()?;
    run_scenario("stub_alternate_user_scenario_passes", &context, |recorder| {
        scenarios::alternate_user(recorder)?;
        Ok("alternate user scenario passed against stub".to_string())
    })?;
    assert_eq!(stub.requests()[0]["userId"], json!("test-user-456"));
    Ok(())
}

#[test]
fn stub_empty_query_scenario_passes() -> ScenarioResult<()> {
    let (stub, context) = qa_context()?;
    run_scenario("stub_empty_query_scenario_passes", &context, |recorder| {
        let decoded = scenarios::empty_query(recorder)?;
        assert_eq!(decoded.result, "Mock response for query: ");
        Ok("empty query scenario passed against stub".to_string())
    })?;
    assert_eq!(stub.requests()[0]["query"], json!(""));
    Ok(())
}

#[test]
fn stub_repeat_yields_independent_replies() -> ScenarioResult<()> {
    let (_stub, context) = qa_context()?;
    let mut recorder = context.recorder();
    let (first, second) = scenarios::stable_repeat(&mut recorder)?;
    assert!(first.success && second.success);
    assert!(first.request_id.is_some());
    assert_ne!(first.request_id, second.request_id);
    assert_eq!(recorder.exchanges().len(), 2);
    Ok(())
}

#[test]
fn stub_unknown_path_returns_not_found() -> ScenarioResult<()> {
    let (stub, context) = qa_context()?;
    let bad_path = ScenarioContext::for_base_url(&format!("{}/missing", stub.base_url()))?;
    let request = ProcessRequest::new("test-user-123", "q");

    let response = bad_path.client().send_process_request(&request)?;
    assert_eq!(response.status_code(), 404);

    let response = context.client().send_process_request(&request)?;
    assert_eq!(response.status_code(), 200);
    Ok(())
}

// ============================================================================
// SECTION: Scenario Isolation
// ============================================================================

#[test]
fn scenarios_on_one_context_record_only_their_own_exchanges() -> ScenarioResult<()> {
    let (_stub, context) = qa_context()?;

    let first = run_scenario("isolation_alternate_user", &context, |recorder| {
        scenarios::alternate_user(recorder)?;
        Ok("alternate user ok".to_string())
    })?;
    let second = run_scenario("isolation_empty_query", &context, |recorder| {
        scenarios::empty_query(recorder)?;
        Ok("empty query ok".to_string())
    })?;

    assert_eq!(user_ids(&first), vec!["test-user-456"]);
    assert_eq!(user_ids(&second), vec!["test-user-789"]);
    Ok(())
}

#[test]
fn concurrent_scenarios_on_one_context_stay_separate() -> ScenarioResult<()> {
    let (stub, context) = qa_context()?;

    let (baseline, empty) = std::thread::scope(|scope| {
        let baseline = scope.spawn(|| {
            run_scenario("concurrent_baseline", &context, |recorder| {
                scenarios::baseline_success(recorder)?;
                Ok("baseline ok".to_string())
            })
            .map_err(|err| err.to_string())
        });
        let empty = scope.spawn(|| {
            run_scenario("concurrent_empty_query", &context, |recorder| {
                scenarios::empty_query(recorder)?;
                Ok("empty query ok".to_string())
            })
            .map_err(|err| err.to_string())
        });
        (baseline.join().expect("baseline thread"), empty.join().expect("empty thread"))
    });

    assert_eq!(user_ids(&baseline?), vec!["test-user-123"]);
    assert_eq!(user_ids(&empty?), vec!["test-user-789"]);
    assert_eq!(stub.requests().len(), 2);
    Ok(())
}

// ============================================================================
// SECTION: Independent Criteria
// ============================================================================

#[test]
fn wrong_environment_fails_baseline_only() -> ScenarioResult<()> {
    let stub = spawn_server_stub(StubBehavior::QaMock {
        environment: "stg".to_string(),
    })?;
    let context = ScenarioContext::for_base_url(stub.base_url())?;

    let err = scenarios::baseline_success(&mut context.recorder()).unwrap_err();
    let violation = err.downcast_ref::<ContractViolation>().expect("contract violation");
    assert_eq!(violation, &ContractViolation::new("environment", "qa", "stg"));

    scenarios::alternate_user(&mut context.recorder())?;
    scenarios::empty_query(&mut context.recorder())?;
    Ok(())
}

#[test]
fn missing_environment_header_is_reported_absent() -> ScenarioResult<()> {
    let (_stub, context) =
        fixed_context(200, None, r#"{"result":"Mock response for query: x","success":true}"#)?;

    let err = scenarios::baseline_success(&mut context.recorder()).unwrap_err();
    let violation = err.downcast_ref::<ContractViolation>().expect("contract violation");
    assert_eq!(violation, &ContractViolation::new("environment", "qa", "<absent>"));
    Ok(())
}

#[test]
fn non_mock_result_text_fails_baseline() -> ScenarioResult<()> {
    let (_stub, context) = fixed_context(
        200,
        Some("qa"),
        r#"{"result":"Processed query: test query for user: test-user-123","success":true}"#,
    )?;

    let err = scenarios::baseline_success(&mut context.recorder()).unwrap_err();
    let violation = err.downcast_ref::<ContractViolation>().expect("contract violation");
    assert_eq!(violation.criterion, "result");
    scenarios::alternate_user(&mut context.recorder())?;
    Ok(())
}

#[test]
fn unsuccessful_reply_fails_every_scenario() -> ScenarioResult<()> {
    let (_stub, context) =
        fixed_context(200, Some("qa"), r#"{"result":"Mock response","success":false}"#)?;

    for outcome in [
        scenarios::baseline_success(&mut context.recorder()),
        scenarios::alternate_user(&mut context.recorder()),
        scenarios::empty_query(&mut context.recorder()),
    ] {
        let err = outcome.unwrap_err();
        let violation = err.downcast_ref::<ContractViolation>().expect("contract violation");
        assert_eq!(violation, &ContractViolation::new("success", "true", "false"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Status, Decode, and Transport Failures
// ============================================================================

#[test]
fn server_error_fails_strict_path_before_decode() -> ScenarioResult<()> {
    let (_stub, context) = fixed_context(500, None, "Error processing request: unavailable")?;

    let err = scenarios::alternate_user(&mut context.recorder()).unwrap_err();
    let client_err = err.downcast_ref::<ClientError>().expect("client error");
    assert!(client_err.is_status(), "expected status failure, got {client_err}");

    let err = scenarios::empty_query(&mut context.recorder()).unwrap_err();
    let violation = err.downcast_ref::<ContractViolation>().expect("contract violation");
    assert_eq!(violation, &ContractViolation::new("status", "200", "500"));
    Ok(())
}

#[test]
fn incompatible_payload_is_a_hard_decode_failure() -> ScenarioResult<()> {
    let (_stub, context) =
        fixed_context(200, Some("qa"), r#"{"result":"Mock response","success":"sure"}"#)?;

    let err = scenarios::alternate_user(&mut context.recorder()).unwrap_err();
    let client_err = err.downcast_ref::<ClientError>().expect("client error");
    assert!(client_err.is_decode(), "expected decode failure, got {client_err}");
    Ok(())
}

#[test]
fn unreachable_service_fails_immediately() -> ScenarioResult<()> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    let context = ScenarioContext::for_base_url(&format!("http://{addr}"))?;

    let mut recorder = context.recorder();
    let err = scenarios::baseline_success(&mut recorder).unwrap_err();
    let client_err = err.downcast_ref::<ClientError>().expect("client error");
    assert!(client_err.is_transport(), "expected transport failure, got {client_err}");
    assert_eq!(recorder.exchanges().len(), 1);
    assert_eq!(recorder.exchanges()[0].status, None);
    assert!(recorder.exchanges()[0].error.is_some());

    let err = run_scenario("unreachable_service_fails_immediately", &context, |recorder| {
        scenarios::baseline_success(recorder)?;
        Ok("unexpected success".to_string())
    })
    .unwrap_err();
    assert!(err.downcast_ref::<ClientError>().is_some_and(ClientError::is_transport));
    Ok(())
}
