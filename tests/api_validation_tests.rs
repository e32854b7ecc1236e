// SPDX-License-Identifier: MIT

//! Request validation tests.
//!
//! Everything here fails before the store is touched, so the offline mock
//! database is enough.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use fitness_backend::middleware::auth::create_jwt;
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signup_rejects_wrong_content_type() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("email=a@b.c"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Content-Type must be application/json");
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"not-an-email","name":"Sam","password":"longenough1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"sam@example.com","name":"Sam","password":"short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_malformed_json() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goals_reject_invalid_date() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("test-user", &state.config.jwt_secret).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/goals/24-08-2026")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid date format");
}

#[tokio::test]
async fn test_create_goal_rejects_unknown_type() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("test-user", &state.config.jwt_secret).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/goals/2026-08-24")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"type":"meditation","goal":{}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid goal type");
}

#[tokio::test]
async fn test_upsert_by_name_rejects_weight_goals() {
    // Weight records carry no goal name, so the name-keyed route could never
    // re-match one; allowing creation would append a duplicate on every call.
    let (app, state) = common::create_test_app();
    let token = create_jwt("test-user", &state.config.jwt_secret).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/goals/2026-08-24/name/Weigh-in")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"type":"weight","goal":{"targetWeight":70.0,"currentWeight":75.0,"unit":"kg"}}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unsupported goal type");
}

#[tokio::test]
async fn test_profile_update_malformed_json_uses_error_envelope() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("test-user", &state.config.jwt_secret).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/users/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_food_log_wrong_content_type_uses_error_envelope() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("test-user", &state.config.jwt_secret).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/food")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("banana"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Content-Type must be application/json");
}

#[tokio::test]
async fn test_food_log_rejects_empty_name() {
    let (app, state) = common::create_test_app();
    let token = create_jwt("test-user", &state.config.jwt_secret).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/food")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
