use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Gemini REST API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on a single model call when `ADVISORY_REQUEST_TIMEOUT_SECS` is unset.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub advisory: AdvisorySettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Missing outside production; advisory calls then fail with a
    /// configuration error instead of reaching the API.
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AdvisorySettings {
    pub request_timeout: Duration,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

impl AdvisoryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = match get_env("GEMINI_API_KEY", None, is_prod) {
            Ok(key) if !key.trim().is_empty() => Some(Secret::new(key)),
            Ok(_) if is_prod => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "GEMINI_API_KEY is required in production but empty"
                )))
            }
            Ok(_) => None,
            Err(e) if is_prod => return Err(e),
            Err(_) => None,
        };

        let request_timeout_secs = parse_env::<u64>(
            "ADVISORY_REQUEST_TIMEOUT_SECS",
            Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
            is_prod,
        )?
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(AdvisoryConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key,
                model: get_env("GEMINI_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
            },
            advisory: AdvisorySettings {
                request_timeout: Duration::from_secs(request_timeout_secs),
                temperature: parse_env("ADVISORY_TEMPERATURE", Some(""), is_prod)?,
                max_output_tokens: parse_env("ADVISORY_MAX_OUTPUT_TOKENS", Some(""), is_prod)?,
            },
            cors: CorsSettings {
                allowed_origins: get_env("CORS_ALLOWED_ORIGINS", Some("*"), is_prod)?
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if let Some(def) = default {
                Ok(def.to_string())
            } else if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Optional typed variable. Empty means unset; anything else must parse.
fn parse_env<T>(key: &str, default: Option<&str>, is_prod: bool) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(key, default, is_prod)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>().map(Some).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
