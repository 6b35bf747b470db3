// ABOUTME: Integration tests for the error taxonomy and HTTP error envelope
// ABOUTME: Verifies status mapping, detail payloads, and serialization

use chrono::Utc;
use planforge::errors::{AppError, ErrorCode, ErrorResponse};

#[test]
fn test_error_code_http_status() {
    assert_eq!(ErrorCode::AuthInvalid.http_status(), 401);
    assert_eq!(ErrorCode::RateLimitExceeded.http_status(), 429);
    assert_eq!(ErrorCode::ValidationFailed.http_status(), 400);
    assert_eq!(ErrorCode::GenerationFailed.http_status(), 500);
    assert_eq!(ErrorCode::InternalError.http_status(), 500);
}

#[test]
fn test_rate_limit_error_carries_limit_and_reset() {
    let reset_at = Utc::now();
    let error = AppError::rate_limit_exceeded(10, reset_at);

    assert_eq!(error.code, ErrorCode::RateLimitExceeded);
    assert_eq!(error.details["limit"], 10);
    assert!(error.details["reset_at"].is_string());
}

#[test]
fn test_generation_failure_message_is_generic() {
    let error = AppError::generation_failed();

    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert!(!error.message.to_lowercase().contains("model"));
    assert!(!error.message.contains("gpt"));
}

#[test]
fn test_error_response_serialization() {
    let error = AppError::validation_failed(serde_json::json!({
        "violations": [{ "field": "goal", "message": "must not be empty" }]
    }));
    let response = ErrorResponse::from(error);

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("VALIDATION_FAILED"));
    assert!(json.contains("violations"));
}

#[test]
fn test_anyhow_conversion_is_internal() {
    let source = anyhow::anyhow!("backing store unavailable");
    let error = AppError::from(source);

    assert_eq!(error.code, ErrorCode::InternalError);
}
