//! Endpoint behaviour of `POST /health-advisory`, driven through the router
//! with a mock model provider.

mod common;

use advisory_service::services::providers::mock::MockBehavior;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::util::ServiceExt;

async fn post_advisory(router: Router, body: Value) -> Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health-advisory")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn with(field: &str, value: Value) -> Value {
    let mut body = common::delhi_runner();
    body[field] = value;
    body
}

#[tokio::test]
async fn delhi_runner_gets_full_report() {
    let (router, mock) = common::router_with(MockBehavior::Reply(common::delhi_reply()));

    let response = post_advisory(router, common::delhi_runner()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let message = body["message"].as_str().unwrap();

    let mut cursor = 0;
    for header in [
        "🌿 **Air Quality Health Advisory Report**",
        "🧍 **Profile Summary**",
        "📊 **Air Quality Risk Assessment**",
        "🏃 **Activity Guidance**",
        "🛡️ **Recommended Precautions**",
        "👨‍👩‍👧‍👦 **Special Care**",
        "🌱 **Lifestyle Tips**",
        "⚠️ **Disclaimer**",
    ] {
        let at = message[cursor..]
            .find(header)
            .unwrap_or_else(|| panic!("{} missing or out of order", header));
        cursor += at + header.len();
    }

    assert!(message.contains("• Safe To Do: No"));
    assert!(message.contains("Mask:\nWear a well-fitted N95 mask"));

    assert_eq!(mock.call_count(), 1);
    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("City: Delhi"));
    assert!(prompt.contains("AQI: 280"));
    assert!(prompt.contains("Planned Activity: Running outdoors"));
}

#[tokio::test]
async fn out_of_range_fields_are_rejected_before_the_model() {
    for (field, value) in [
        ("age", json!(121)),
        ("aqi", json!(0)),
        ("aqi", json!(1001)),
        ("city", json!("D")),
        ("activity", json!("   ")),
    ] {
        let (router, mock) = common::router_with(MockBehavior::Reply(common::delhi_reply()));

        let response = post_advisory(router, with(field, value.clone())).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "{} = {}",
            field,
            value
        );

        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
        assert_eq!(mock.call_count(), 0);
    }
}

#[tokio::test]
async fn boundary_values_are_accepted() {
    for (field, value) in [("age", json!(120)), ("aqi", json!(1)), ("aqi", json!(1000))] {
        let (router, mock) = common::router_with(MockBehavior::Reply("{}".to_string()));

        let response = post_advisory(router, with(field, value)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mock.call_count(), 1);
    }
}

#[tokio::test]
async fn zero_age_passes_schema_but_is_refused() {
    let (router, mock) = common::router_with(MockBehavior::Reply(common::delhi_reply()));

    let response = post_advisory(router, with("age", json!(0))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid age");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn unknown_enum_value_is_a_bad_request() {
    let (router, mock) = common::router_with(MockBehavior::Reply(common::delhi_reply()));

    let response = post_advisory(router, with("gender", json!("robot"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Json parse error"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn missing_field_is_a_bad_request() {
    let (router, mock) = common::router_with(MockBehavior::Reply(common::delhi_reply()));

    let mut body = common::delhi_runner();
    body.as_object_mut().unwrap().remove("city");

    let response = post_advisory(router, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_still_answers_ok() {
    let (router, _mock) =
        common::router_with(MockBehavior::Fail("quota exceeded".to_string()));

    let response = post_advisory(router, common::delhi_runner()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "❌ Error: API error: quota exceeded");
}

#[tokio::test]
async fn malformed_model_output_reports_invalid_json() {
    let (router, _mock) =
        common::router_with(MockBehavior::Reply("I cannot help with that.".to_string()));

    let response = post_advisory(router, common::delhi_runner()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["message"], "❌ Error: Invalid JSON from model");
}

#[tokio::test]
async fn fenced_model_output_is_still_parsed() {
    let reply = format!("```json\n{}\n```", common::delhi_reply());
    let (router, _mock) = common::router_with(MockBehavior::Reply(reply));

    let response = post_advisory(router, common::delhi_runner()).await;
    let body = json_body(response).await;

    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("• Recommendation: Switch to an indoor workout today"));
}

#[tokio::test]
async fn missing_credentials_is_a_server_error() {
    let (router, _mock) = common::router_with(MockBehavior::Unconfigured);

    let response = post_advisory(router, common::delhi_runner()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Configuration error");
}

#[tokio::test]
async fn slow_model_times_out_into_error_message() {
    let mut config = common::test_config();
    config.advisory.request_timeout = Duration::from_millis(20);
    let mock = std::sync::Arc::new(
        advisory_service::services::providers::mock::MockTextProvider::new(MockBehavior::Delay(
            Duration::from_millis(500),
            common::delhi_reply(),
        )),
    );
    let router = advisory_service::startup::build_router(advisory_service::startup::AppState::new(
        config, mock,
    ));

    let response = post_advisory(router, common::delhi_runner()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().starts_with("❌ Error:"));
    assert!(body["message"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let (router, _mock) = common::router_with(MockBehavior::Reply(common::delhi_reply()));

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health-advisory")
                .header("content-type", "application/json")
                .header("x-request-id", "req-123")
                .body(Body::from(common::delhi_runner().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
