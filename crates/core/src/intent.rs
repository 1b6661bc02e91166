use serde::Deserialize;
use serde_json::Value;

use crate::models::{Intent, IntentResult};

pub const DEFAULT_CONFIDENCE: f32 = 0.8;
pub const DEFAULT_RESPONSE_TEXT: &str = "Извините, не понял ваш запрос";

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Parses a model reply that is expected to be a JSON object. Returns `None`
/// when the text is not an object, so the caller can fall back to plain text.
///
/// Fields are read one at a time: a field with an unexpected type falls back
/// to its default instead of rejecting the whole reply.
pub fn parse_intent_reply(reply: &str) -> Option<IntentResult> {
    let body = strip_code_fence(reply.trim());
    let value = serde_json::from_str::<Value>(body).ok()?;
    let fields = value.as_object()?;

    let intent = fields
        .get("intent")
        .and_then(|value| Intent::deserialize(value).ok())
        .unwrap_or(Intent::General);

    let confidence = fields
        .get("confidence")
        .and_then(read_confidence)
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let destination = fields
        .get("destination")
        .and_then(Value::as_str)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let response_text = fields
        .get("response_text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_RESPONSE_TEXT.to_string());

    let reasoning = match fields.get("reasoning") {
        Some(Value::String(line)) if !line.trim().is_empty() => vec![line.clone()],
        Some(Value::Array(items)) => items.iter().filter_map(reasoning_line).collect(),
        _ => Vec::new(),
    };

    Some(IntentResult {
        intent,
        confidence,
        destination,
        response_text,
        reasoning,
    })
}

fn read_confidence(value: &Value) -> Option<f32> {
    match value {
        Value::Number(number) => number.as_f64().map(|value| value as f32),
        Value::String(text) => text.trim().parse::<f32>().ok(),
        _ => None,
    }
}

fn reasoning_line(item: &Value) -> Option<String> {
    match item {
        Value::String(line) => Some(line.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_reply() {
        let parsed = parse_intent_reply(
            r#"{"intent":"get_route","confidence":0.75,"destination":"Байтерек","response_text":"Поехали!","reasoning":["есть маршрут"]}"#,
        )
        .expect("structured reply");

        assert_eq!(parsed.intent, Intent::GetRoute);
        assert_eq!(parsed.confidence, 0.75);
        assert_eq!(parsed.destination.as_deref(), Some("Байтерек"));
        assert_eq!(parsed.reasoning, vec!["есть маршрут".to_string()]);
        assert_eq!(parsed.wants_route(), Some("Байтерек"));
    }

    #[test]
    fn tolerates_fences_and_loose_fields() {
        let parsed = parse_intent_reply(
            "```json\n{\"intent\":\"teleport\",\"reasoning\":\"одна строка\",\"confidence\":4}\n```",
        )
        .expect("fenced reply");

        assert_eq!(parsed.intent, Intent::General);
        assert_eq!(parsed.confidence, 1.0);
        assert_eq!(parsed.response_text, DEFAULT_RESPONSE_TEXT);
        assert_eq!(parsed.reasoning, vec!["одна строка".to_string()]);
        assert!(parsed.destination.is_none());
    }

    #[test]
    fn string_confidence_keeps_structured_reply() {
        let parsed = parse_intent_reply(
            r#"{"intent":"get_route","confidence":"0.9","destination":"Байтерек","response_text":"Строю маршрут","reasoning":["маршрут", 2]}"#,
        )
        .expect("structured reply");

        assert_eq!(parsed.intent, Intent::GetRoute);
        assert_eq!(parsed.confidence, 0.9);
        assert_eq!(parsed.wants_route(), Some("Байтерек"));
        assert_eq!(parsed.response_text, "Строю маршрут");
        assert_eq!(parsed.reasoning, vec!["маршрут".to_string(), "2".to_string()]);
    }

    #[test]
    fn mistyped_fields_fall_back_to_defaults() {
        let parsed = parse_intent_reply(
            r#"{"intent":7,"confidence":"high","destination":42,"response_text":{"text":"x"}}"#,
        )
        .expect("structured reply");

        assert_eq!(parsed.intent, Intent::General);
        assert_eq!(parsed.confidence, DEFAULT_CONFIDENCE);
        assert!(parsed.destination.is_none());
        assert_eq!(parsed.response_text, DEFAULT_RESPONSE_TEXT);
        assert!(parsed.reasoning.is_empty());
    }

    #[test]
    fn plain_text_is_not_structured() {
        assert!(parse_intent_reply("Байтерек находится в Астане.").is_none());
        assert!(parse_intent_reply("[1, 2, 3]").is_none());
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_text("  маршрут \n к   Байтереку "), "маршрут к Байтереку");
    }
}
