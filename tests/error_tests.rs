// SPDX-License-Identifier: MIT

//! Error-to-response mapping tests.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use patient_registry::error::AppError;

async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_status_mapping() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (
            AppError::NotFound("street".to_string()),
            StatusCode::NOT_FOUND,
        ),
        (
            AppError::BadRequest("field".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::Conflict("duplicate".to_string()),
            StatusCode::CONFLICT,
        ),
        (
            AppError::Geocoding("out of bounds".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::GeocodingApi("timeout".to_string()),
            StatusCode::BAD_GATEWAY,
        ),
        (
            AppError::Database("boom".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        let (status, body) = render(err).await;
        assert_eq!(status, expected);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_internal_details_not_leaked() {
    let (status, body) = render(AppError::Database("credentials xyz".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["message"].as_str().unwrap().contains("xyz"));

    let (_, body) =
        render(AppError::Internal(anyhow::anyhow!("connection string abc"))).await;
    assert!(!body["message"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn test_credential_errors_are_generic() {
    // Unknown user and wrong password must render identically.
    let (status, body) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");
}
