#![allow(dead_code)]

use advisory_service::config::{AdvisoryConfig, AdvisorySettings, CorsSettings, GeminiSettings};
use advisory_service::services::providers::mock::{MockBehavior, MockTextProvider};
use advisory_service::startup::{build_router, AppState, Application};
use axum::Router;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config;
use std::sync::Arc;
use std::time::Duration;

pub fn test_config() -> AdvisoryConfig {
    AdvisoryConfig {
        common: Config {
            port: 0, // Random port
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        gemini: GeminiSettings {
            api_key: Some(Secret::new("test-api-key".to_string())),
            model: "gemini-2.0-flash".to_string(),
            api_base: "http://127.0.0.1:1".to_string(),
        },
        advisory: AdvisorySettings {
            request_timeout: Duration::from_secs(5),
            temperature: None,
            max_output_tokens: None,
        },
        cors: CorsSettings {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

/// Router backed by a mock provider, for `oneshot` requests.
pub fn router_with(behavior: MockBehavior) -> (Router, Arc<MockTextProvider>) {
    let mock = Arc::new(MockTextProvider::new(behavior));
    let state = AppState::new(test_config(), mock.clone());
    (build_router(state), mock)
}

pub struct TestApp {
    pub address: String,
    pub mock: Arc<MockTextProvider>,
}

impl TestApp {
    pub async fn spawn(behavior: MockBehavior) -> Self {
        let mock = Arc::new(MockTextProvider::new(behavior));
        let app = Application::build_with_provider(test_config(), mock.clone())
            .await
            .expect("Failed to build application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        Self { address, mock }
    }
}

pub fn delhi_runner() -> Value {
    json!({
        "age": 28,
        "gender": "male",
        "people_type": "adult",
        "disease": "none",
        "city": "Delhi",
        "aqi": 280,
        "activity": "Running outdoors"
    })
}

pub fn delhi_reply() -> String {
    json!({
        "profile_summary": "28-year-old adult male in Delhi with no existing conditions",
        "aqi_assessment": {
            "risk_level": "Very High",
            "impact": "Prolonged exertion may cause breathing discomfort"
        },
        "activity_guidance": {
            "activity": "Running outdoors",
            "is_safe": "No",
            "recommendation": "Switch to an indoor workout today",
            "precautions": "If you must go out, keep it short and slow"
        },
        "precautions": {
            "outdoor_advice": "Limit time outdoors",
            "mask_recommendation": "Wear a well-fitted N95 mask",
            "home_protection": "Keep windows closed during peak hours"
        },
        "special_care": {
            "children": "Keep children indoors",
            "elderly": "Avoid outdoor exertion",
            "respiratory_patients": "Stay indoors and monitor symptoms"
        },
        "lifestyle_tips": "Stay hydrated and ventilate when air improves",
        "disclaimer": "Educational guidance only"
    })
    .to_string()
}
