//! Best-effort extraction of the advisory JSON from free-form model output.
//!
//! Models sometimes wrap their JSON in prose or code fences, so the parser takes
//! the span from the first `{` to the last `}` instead of requiring the whole
//! reply to be JSON. A reply with a stray brace outside the payload therefore
//! fails to parse and comes back as the error sentinel.

use crate::models::{AdvisoryPayload, ErrorPayload, ModelReply};
use serde_json::Value;

/// Parse raw model output. Never fails; failures become [`ModelReply::Error`].
pub fn parse(raw: &str) -> ModelReply {
    let Some(span) = extract_json_block(raw) else {
        tracing::warn!(raw_len = raw.len(), "Model reply contains no JSON object");
        return ModelReply::Error(ErrorPayload::invalid_json(raw));
    };

    let value: Value = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, raw_len = raw.len(), "Model reply is not valid JSON");
            return ModelReply::Error(ErrorPayload::invalid_json(raw));
        }
    };

    from_value(value)
}

/// Outermost `{...}` span, inclusive.
pub fn extract_json_block(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&input[start..=end])
}

fn from_value(value: Value) -> ModelReply {
    let Value::Object(ref map) = value else {
        return ModelReply::Unstructured(value);
    };

    if let Some(error) = map.get("error") {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return ModelReply::Error(ErrorPayload::new(message));
    }

    match serde_json::from_value::<AdvisoryPayload>(value.clone()) {
        Ok(payload) => ModelReply::Advisory(payload),
        Err(_) => ModelReply::Unstructured(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::INVALID_JSON_MESSAGE;
    use serde_json::json;

    #[test]
    fn ignores_prose_around_the_payload() {
        let reply = parse("blah {\"profile_summary\":\"ok\"} blah");

        match reply {
            ModelReply::Advisory(payload) => {
                assert_eq!(payload.profile_summary.as_deref(), Some("ok"));
                assert_eq!(payload.aqi_assessment, None);
            }
            other => panic!("expected advisory, got {:?}", other),
        }
    }

    #[test]
    fn strips_markdown_code_fences() {
        let raw = "```json\n{\"lifestyle_tips\": \"Hydrate\"}\n```";
        let ModelReply::Advisory(payload) = parse(raw) else {
            panic!("expected advisory");
        };
        assert_eq!(payload.lifestyle_tips.as_deref(), Some("Hydrate"));
    }

    #[test]
    fn reply_without_braces_keeps_raw_text() {
        let raw = "I cannot help with that.";
        assert_eq!(
            parse(raw),
            ModelReply::Error(ErrorPayload {
                error: INVALID_JSON_MESSAGE.to_string(),
                raw: Some(raw.to_string()),
            })
        );
    }

    #[test]
    fn unbalanced_braces_keep_raw_text() {
        for raw in ["{\"profile_summary\": \"ok\"", "} backwards {", "{ not json }"] {
            let ModelReply::Error(payload) = parse(raw) else {
                panic!("expected error for {:?}", raw);
            };
            assert_eq!(payload.error, INVALID_JSON_MESSAGE);
            assert_eq!(payload.raw.as_deref(), Some(raw));
        }
    }

    #[test]
    fn empty_reply_is_invalid_json() {
        let ModelReply::Error(payload) = parse("") else {
            panic!("expected error");
        };
        assert_eq!(payload.raw.as_deref(), Some(""));
    }

    #[test]
    fn stray_brace_in_trailing_prose_breaks_the_span() {
        let raw = "{\"profile_summary\":\"ok\"} note: see {appendix}";
        assert!(matches!(parse(raw), ModelReply::Error(_)));
    }

    #[test]
    fn error_key_becomes_error_sentinel() {
        assert_eq!(
            parse("{\"error\": \"quota exhausted\"}"),
            ModelReply::Error(ErrorPayload::new("quota exhausted"))
        );
        assert_eq!(
            parse("{\"error\": {\"code\": 7}}"),
            ModelReply::Error(ErrorPayload::new("{\"code\":7}"))
        );
    }

    #[test]
    fn non_object_json_is_unstructured() {
        assert_eq!(from_value(json!([1, 2])), ModelReply::Unstructured(json!([1, 2])));
    }

    #[test]
    fn extract_json_block_spans_first_to_last_brace() {
        assert_eq!(extract_json_block("a {b} {c} d"), Some("{b} {c}"));
        assert_eq!(extract_json_block("no braces"), None);
    }
}
