//! Tests for the domain error payload and its trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
#[case(ErrorCode::ServiceUnavailable, true)]
#[case(ErrorCode::Conflict, false)]
#[case(ErrorCode::NotFound, false)]
#[case(ErrorCode::InternalError, false)]
fn only_service_unavailable_is_retryable(#[case] code: ErrorCode, #[case] expected: bool) {
    assert_eq!(Error::new(code, "message").is_retryable(), expected);
}

#[rstest]
fn serialises_to_camel_case_payload() {
    let error = Error::conflict("already registered")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "reason": "already_registered" }));

    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({
            "code": "conflict",
            "message": "already registered",
            "traceId": TRACE_ID,
            "details": { "reason": "already_registered" },
        })
    );
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let payload = json!({ "code": "not_found", "message": " " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
