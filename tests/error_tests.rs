//! Error handling module unit tests

use serde_json::{json, Value};
use sparkapi::utils::error::helpers::*;
use sparkapi::utils::error::*;

#[test]
fn test_classify_table() {
    let body = json!({"message": "details"});
    let test_cases = vec![
        (401, "unauthorized"),
        (404, "not_found"),
        (429, "too_many_requests"),
        (500, "server_error"),
        (503, "server_error"),
        (599, "server_error"),
        (400, "invalid_request"),
        (403, "invalid_request"),
        (409, "invalid_request"),
        (499, "invalid_request"),
        (200, "api_error"),
        (301, "api_error"),
        (600, "api_error"),
    ];

    for (status, expected_type) in test_cases {
        let error = SparkError::classify(status, None, body.clone());
        assert_eq!(error.error_type(), expected_type, "status {}", status);
        assert_eq!(error.status(), Some(status), "status {}", status);
        assert_eq!(error.body(), Some(&body), "status {}", status);
        assert!(error.is_api_error());
    }
}

#[test]
fn test_not_found_carries_body() {
    let body = json!({"message": "gone", "trackingId": "T"});
    match SparkError::classify(404, None, body.clone()) {
        SparkError::NotFound { body: carried } => assert_eq!(carried, body),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_too_many_requests_retry_after() {
    let error = SparkError::classify(429, Some("120"), Value::Null);
    assert!(matches!(error, SparkError::TooManyRequests { retry_after: 120, .. }));

    let error = SparkError::classify(429, None, Value::Null);
    assert_eq!(error.retry_after(), Some(DEFAULT_RETRY_AFTER));
    assert_eq!(DEFAULT_RETRY_AFTER, 3600);

    let error = SparkError::classify(429, Some("Wed, 21 Oct 2015 07:28:00 GMT"), Value::Null);
    assert_eq!(error.retry_after(), Some(3600));
}

#[test]
fn test_server_and_invalid_request_carry_status() {
    let body = json!({"message": "x"});
    assert!(matches!(
        SparkError::classify(503, None, body.clone()),
        SparkError::ServerError { status: 503, body: ref b } if *b == body
    ));
    assert!(matches!(
        SparkError::classify(403, None, body.clone()),
        SparkError::InvalidRequest { status: 403, body: ref b } if *b == body
    ));
}

#[test]
fn test_generic_carries_fixed_message() {
    match SparkError::classify(302, None, Value::Null) {
        SparkError::Generic { status, message, .. } => {
            assert_eq!(status, 302);
            assert_eq!(message, GENERIC_FAILURE_MESSAGE);
        }
        other => panic!("Expected Generic, got {:?}", other),
    }
}

#[test]
fn test_error_messages() {
    assert_eq!(
        SparkError::classify(401, None, Value::Null).to_string(),
        "Request not authorized"
    );
    assert_eq!(
        SparkError::classify(429, Some("5"), Value::Null).to_string(),
        "Too many requests, please try again after 5 seconds"
    );
    assert_eq!(
        SparkError::classify(500, None, json!({"a": 1})).to_string(),
        "Something went wrong on the server: status code 500, content: {\"a\":1}"
    );
}

#[test]
fn test_validation_is_not_an_api_error() {
    let err = validation_error("roomId is required");
    assert!(!err.is_api_error());
    assert_eq!(err.status(), None);
    assert_eq!(err.body(), None);
    assert_eq!(err.retry_after(), None);
    assert_eq!(err.error_type(), "validation_error");
}

#[test]
fn test_closed_is_not_an_api_error() {
    let err = SparkError::Closed;
    assert!(!err.is_api_error());
    assert_eq!(err.status(), None);
    assert_eq!(err.error_type(), "client_closed");
    assert_eq!(err.to_string(), "Client has been closed");
}

#[test]
fn test_from_conversions() {
    let json_err = serde_json::from_str::<Value>("{").unwrap_err();
    let err: SparkError = json_err.into();
    assert!(matches!(err, SparkError::Serialization(_)));

    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: SparkError = io_err.into();
    assert!(matches!(err, SparkError::Attachment(_)));
    assert!(err.to_string().contains("file not found"));
}

#[test]
fn test_decode_body() {
    assert_eq!(decode_body("   "), Value::Null);
    assert_eq!(decode_body("[1,2]"), json!([1, 2]));
    assert_eq!(decode_body("<html>"), json!("<html>"));
}
