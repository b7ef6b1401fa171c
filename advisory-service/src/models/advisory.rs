//! Structured advisory as read from model output, plus its error sentinel.
//!
//! Every field is optional and read leniently: the model is asked for a fixed
//! JSON shape but nothing guarantees it, so wrong types degrade to "absent"
//! instead of failing the whole reply. Defaults are applied in exactly one
//! place, [`AdvisoryReport::from`].

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON from model";

const NOT_AVAILABLE: &str = "Not available";
const NOT_APPLICABLE: &str = "Not applicable";
const NOT_SPECIFIED: &str = "Not specified";
const UNKNOWN: &str = "Unknown";

/// Categorical air-quality severity used in advisories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Severe,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::VeryHigh,
        RiskLevel::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
            RiskLevel::Severe => "Severe",
        }
    }

    /// Case- and separator-insensitive match ("very_high", "VERY HIGH").
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        Self::ALL.into_iter().find(|level| {
            level
                .as_str()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
                == normalized
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AqiAssessment {
    #[serde(default, deserialize_with = "lenient_text")]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActivityGuidance {
    #[serde(default, deserialize_with = "lenient_text")]
    pub activity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub is_safe: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub precautions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Precautions {
    #[serde(default, deserialize_with = "lenient_text")]
    pub outdoor_advice: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mask_recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub home_protection: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpecialCare {
    #[serde(default, deserialize_with = "lenient_text")]
    pub children: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub elderly: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub respiratory_patients: Option<String>,
}

/// Advisory as parsed from the model. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdvisoryPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    pub profile_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub aqi_assessment: Option<AqiAssessment>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub activity_guidance: Option<ActivityGuidance>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub precautions: Option<Precautions>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub special_care: Option<SpecialCare>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lifestyle_tips: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub disclaimer: Option<String>,
}

/// Sentinel standing in for a failed advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    pub error: String,
    /// Unmodified model output, kept when the failure was a parse failure.
    pub raw: Option<String>,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw: None,
        }
    }

    pub fn invalid_json(raw: &str) -> Self {
        Self {
            error: INVALID_JSON_MESSAGE.to_string(),
            raw: Some(raw.to_string()),
        }
    }
}

/// Everything the advisory pipeline can hand to the formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Advisory(AdvisoryPayload),
    Error(ErrorPayload),
    /// Valid JSON that is not a mapping.
    Unstructured(Value),
}

/// Advisory with every default filled in, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryReport {
    pub profile_summary: String,
    pub risk_level: String,
    pub impact: String,
    pub activity: String,
    pub is_safe: String,
    pub recommendation: String,
    pub activity_precautions: String,
    pub outdoor_advice: String,
    pub mask_recommendation: String,
    pub home_protection: String,
    pub children: String,
    pub elderly: String,
    pub respiratory_patients: String,
    pub lifestyle_tips: String,
    pub disclaimer: String,
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

impl From<&AdvisoryPayload> for AdvisoryReport {
    fn from(payload: &AdvisoryPayload) -> Self {
        let aqi = payload.aqi_assessment.clone().unwrap_or_default();
        let activity = payload.activity_guidance.clone().unwrap_or_default();
        let precautions = payload.precautions.clone().unwrap_or_default();
        let special = payload.special_care.clone().unwrap_or_default();

        let risk_level = aqi
            .risk_level
            .as_deref()
            .map(|label| {
                RiskLevel::from_label(label)
                    .map(|level| level.as_str().to_string())
                    .unwrap_or_else(|| label.to_string())
            })
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            profile_summary: or_default(&payload.profile_summary, NOT_AVAILABLE),
            risk_level,
            impact: or_default(&aqi.impact, NOT_AVAILABLE),
            activity: or_default(&activity.activity, NOT_SPECIFIED),
            is_safe: or_default(&activity.is_safe, UNKNOWN),
            recommendation: or_default(&activity.recommendation, NOT_AVAILABLE),
            activity_precautions: or_default(&activity.precautions, NOT_AVAILABLE),
            outdoor_advice: or_default(&precautions.outdoor_advice, NOT_AVAILABLE),
            mask_recommendation: or_default(&precautions.mask_recommendation, NOT_AVAILABLE),
            home_protection: or_default(&precautions.home_protection, NOT_AVAILABLE),
            children: or_default(&special.children, NOT_APPLICABLE),
            elderly: or_default(&special.elderly, NOT_APPLICABLE),
            respiratory_patients: or_default(&special.respiratory_patients, NOT_APPLICABLE),
            lifestyle_tips: or_default(&payload.lifestyle_tips, NOT_AVAILABLE),
            disclaimer: or_default(&payload.disclaimer, NOT_AVAILABLE),
        }
    }
}

/// Renders any JSON leaf as display text. `null` and empty arrays are absent.
pub(crate) fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(text_from_value).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}
