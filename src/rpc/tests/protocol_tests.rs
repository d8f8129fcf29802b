//! Unit tests for JSON-RPC protocol types.

use crate::rpc::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, TASK_CANNOT_BE_CONTINUED, TASK_NOT_FOUND,
};
use eyre::ensure;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn requests_serialize_with_protocol_version() -> eyre::Result<()> {
    let request = JsonRpcRequest::new(json!(1), "tasks/get", json!({"task_id": "abc"}));
    let encoded = serde_json::to_value(&request)?;

    ensure!(encoded.get("jsonrpc") == Some(&json!("2.0")));
    ensure!(encoded.get("method") == Some(&json!("tasks/get")));
    Ok(())
}

#[rstest]
fn success_and_failure_are_mutually_exclusive() -> eyre::Result<()> {
    let success = JsonRpcResponse::success(json!(1), json!({"ok": true}));
    ensure!(!success.is_error());
    ensure!(success.result.is_some() && success.error.is_none());

    let failure = JsonRpcResponse::failure(json!(1), JsonRpcError::internal("storage down"));
    ensure!(failure.is_error());
    ensure!(failure.result.is_none() && failure.error.is_some());
    Ok(())
}

#[rstest]
#[case(JsonRpcError::invalid_request("no id"), INVALID_REQUEST)]
#[case(JsonRpcError::method_not_found("tasks/list"), METHOD_NOT_FOUND)]
#[case(JsonRpcError::invalid_params("missing field"), INVALID_PARAMS)]
#[case(JsonRpcError::internal("lock poisoned"), INTERNAL_ERROR)]
#[case(JsonRpcError::task_not_found("abc"), TASK_NOT_FOUND)]
#[case(JsonRpcError::task_cannot_be_continued("abc"), TASK_CANNOT_BE_CONTINUED)]
fn error_constructors_use_reserved_codes(#[case] error: JsonRpcError, #[case] code: i64) {
    assert_eq!(error.code, code);
}

#[rstest]
fn responses_round_trip_through_json() -> eyre::Result<()> {
    let response = JsonRpcResponse::failure(json!("req-7"), JsonRpcError::task_not_found("t-1"));

    let encoded = serde_json::to_string(&response)?;
    let decoded: JsonRpcResponse = serde_json::from_str(&encoded)?;

    ensure!(decoded == response);
    Ok(())
}
