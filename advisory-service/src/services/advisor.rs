//! Advisory generation: profile checks, prompt construction and the single
//! model call per request.
//!
//! Model-side failures (transport, API status, timeout, unparseable output)
//! never escape as errors. They come back as [`ModelReply::Error`] so the
//! endpoint can still answer 200 with a readable message. Only a bad profile
//! or a missing credential is returned as [`AdvisoryError`].

use crate::config::AdvisorySettings;
use crate::models::{AdvisoryRequest, ErrorPayload, ModelReply};
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use crate::services::{formatter, metrics, parser};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Fixed instruction sent with every request.
pub const SYSTEM_PROMPT: &str = r#"
You are an Air Quality Health Advisory AI Agent.

PURPOSE:
Provide SAFE, PREVENTIVE, EDUCATIONAL health guidance.

SCOPE:
- AQI precautions
- Outdoor activity safety
- Mask recommendations
- Indoor protection
- Special groups
- Activity safety assessment (running, travel, etc.)

STRICT RULES:
- No diagnosis
- No medicines or medication names
- Prevention only
- Simple language
- Return ONLY JSON

JSON SCHEMA:
{
  "profile_summary": "",
  "aqi_assessment": {
    "risk_level": "Low/Moderate/High/Very High/Severe",
    "impact": ""
  },
  "activity_guidance": {
    "activity": "",
    "is_safe": "Yes/No/Limited",
    "recommendation": "",
    "precautions": ""
  },
  "precautions": {
    "outdoor_advice": "",
    "mask_recommendation": "",
    "home_protection": ""
  },
  "special_care": {
    "children": "",
    "elderly": "",
    "respiratory_patients": ""
  },
  "lifestyle_tips": "",
  "disclaimer": "Educational guidance only"
}
"#;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),
}

impl From<AdvisoryError> for AppError {
    fn from(err: AdvisoryError) -> Self {
        match err {
            AdvisoryError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            AdvisoryError::Configuration(msg) => AppError::ConfigError(anyhow::anyhow!(msg)),
        }
    }
}

/// Checks the model call depends on, independent of request validation.
///
/// Stricter than the request schema on age: a profile aged 0 is accepted by
/// the endpoint schema but refused here.
pub fn validate_profile(request: &AdvisoryRequest) -> Result<(), AdvisoryError> {
    if request.age <= 0 {
        return Err(AdvisoryError::Validation("Invalid age".to_string()));
    }

    if !(0 < request.aqi && request.aqi <= 1000) {
        return Err(AdvisoryError::Validation("Invalid AQI".to_string()));
    }

    if request.activity.trim().is_empty() {
        return Err(AdvisoryError::Validation("Activity is required".to_string()));
    }

    Ok(())
}

/// Per-request prompt listing the profile and the question asked.
pub fn build_prompt(request: &AdvisoryRequest) -> String {
    format!(
        "
PERSON DETAILS:
Age: {age}
Gender: {gender}
Type: {people_type}
Existing Disease: {disease}
City: {city}
AQI: {aqi}
Planned Activity: {activity}

Evaluate if the activity is safe.
Provide precautions and alternatives if unsafe.
Return strictly JSON.
",
        age = request.age,
        gender = request.gender,
        people_type = request.people_type,
        disease = request.disease,
        city = request.city.trim(),
        aqi = request.aqi,
        activity = request.activity.trim(),
    )
}

/// Generates advisories through a shared [`TextProvider`].
#[derive(Clone)]
pub struct AdvisoryService {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
    timeout: Duration,
}

impl AdvisoryService {
    pub fn new(provider: Arc<dyn TextProvider>, settings: &AdvisorySettings) -> Self {
        Self {
            provider,
            params: GenerationParams {
                temperature: settings.temperature,
                max_tokens: settings.max_output_tokens,
                json_output: true,
            },
            timeout: settings.request_timeout,
        }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    /// One model call for `request`, parsed into a [`ModelReply`].
    #[tracing::instrument(
        skip(self, request),
        fields(city = %request.city, aqi = request.aqi, model = %self.provider.model())
    )]
    pub async fn generate_advice(
        &self,
        request: &AdvisoryRequest,
    ) -> Result<ModelReply, AdvisoryError> {
        validate_profile(request)?;

        let prompt = build_prompt(request);
        let model = self.provider.model().to_string();
        let started = Instant::now();

        let result = tokio::time::timeout(
            self.timeout,
            self.provider.generate(SYSTEM_PROMPT, &prompt, &self.params),
        )
        .await;

        let elapsed = started.elapsed().as_secs_f64();
        metrics::record_provider_latency(&model, elapsed);

        let response = match result {
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Model call timed out");
                metrics::record_provider_error("timeout");
                metrics::record_advisory_outcome("timeout");
                return Ok(ModelReply::Error(ErrorPayload::new(format!(
                    "Advisory generation timed out after {:?}",
                    self.timeout
                ))));
            }
            Ok(Err(ProviderError::NotConfigured(msg))) => {
                tracing::error!(error = %msg, "Model provider is not configured");
                metrics::record_provider_error("not_configured");
                return Err(AdvisoryError::Configuration(msg));
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, latency_secs = elapsed, "Model call failed");
                metrics::record_provider_error(e.kind());
                metrics::record_advisory_outcome("model_error");
                return Ok(ModelReply::Error(ErrorPayload::new(e.to_string())));
            }
            Ok(Ok(response)) => response,
        };

        metrics::record_tokens(&model, response.input_tokens, response.output_tokens);

        let raw = response.text.unwrap_or_default();
        let reply = parser::parse(&raw);

        let outcome = match &reply {
            ModelReply::Advisory(_) => "advisory",
            ModelReply::Error(_) => "malformed_reply",
            ModelReply::Unstructured(_) => "unstructured_reply",
        };
        metrics::record_advisory_outcome(outcome);

        tracing::info!(
            outcome,
            latency_secs = elapsed,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Advisory generated"
        );

        Ok(reply)
    }

    /// Generate and render in one step.
    pub async fn advisory_text(&self, request: &AdvisoryRequest) -> Result<String, AdvisoryError> {
        let reply = self.generate_advice(request).await?;
        Ok(formatter::format(&reply))
    }
}
