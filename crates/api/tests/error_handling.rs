//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use stockroom_api::error::AppError;
use stockroom_core::error::CoreError;
use stockroom_db::LedgerError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Asset",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Asset with id 42 not found");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn validation_error_returns_400_with_validation_code() {
    let err = AppError::Core(CoreError::Validation("asset_tag is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "asset_tag is required");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict(
        "Asset \"Dell Latitude\" (IT-001) is already on loan".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Asset \"Dell Latitude\" (IT-001) is already on loan");
}

#[tokio::test]
async fn internal_errors_hide_their_details() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Internal("pool exhausted".into()))).await;
    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let err: AppError = LedgerError::Core(CoreError::Internal(
        "Loan 7 references missing asset 3".into(),
    ))
    .into();
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn ledger_errors_keep_their_domain_meaning() {
    let err: AppError = LedgerError::Core(CoreError::NotFound {
        entity: "Loan",
        id: 7,
    })
    .into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Loan with id 7 not found");

    let err: AppError = LedgerError::Database(sqlx::Error::PoolTimedOut).into();
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
}
