//! Coerce the model's untrusted JSON reply into a [`DiagnosisResult`].
//!
//! Every field has its own parse-or-default step. Nothing here fails: a reply
//! that is not JSON at all still produces a complete result built from the
//! fallback constants.

use super::{
    Condition, DiagnosisResult, FALLBACK_ADVICE, LOW_CONFIDENCE_THRESHOLD, LOW_CONFIDENCE_WARNING,
    UNKNOWN_CONDITION_LABEL,
};
use serde_json::{Map, Value};

/// Turn the raw model text into a result that satisfies the response shape.
pub fn repair_reply(raw: &str) -> DiagnosisResult {
    let mut object = parse_object(raw);

    let is_healthy = object
        .get("is_healthy")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut advice = repair_advice(object.remove("advice"));

    let raw_conditions = object.remove("top_conditions");
    let lead = lead_confidence(raw_conditions.as_ref());
    let top_conditions = repair_conditions(raw_conditions);

    // Runs after the advice fallback so the fallback list can carry the warning.
    let top_confidence =
        lead.unwrap_or_else(|| top_conditions.first().map_or(0.0, |c| c.confidence));
    if top_confidence < LOW_CONFIDENCE_THRESHOLD {
        advice.insert(0, LOW_CONFIDENCE_WARNING.to_string());
    }

    DiagnosisResult {
        is_healthy,
        top_conditions,
        advice,
    }
}

/// Parse the reply as a JSON object, or return the empty baseline.
fn parse_object(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(strip_code_fence(raw)) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            tracing::warn!(
                json_type = json_type(&other),
                "Model reply is not a JSON object, using baseline"
            );
            Map::new()
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                reply_len = raw.len(),
                "Model reply is not valid JSON, using baseline"
            );
            Map::new()
        }
    }
}

/// Drop a surrounding ```` ``` ```` / ```` ```json ```` fence if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

fn repair_advice(value: Option<Value>) -> Vec<String> {
    let advice: Vec<String> = match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(advice_item).collect(),
        _ => Vec::new(),
    };

    if advice.is_empty() {
        tracing::debug!("Substituting fallback advice");
        return FALLBACK_ADVICE.iter().map(|s| s.to_string()).collect();
    }

    advice
}

fn advice_item(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn repair_conditions(value: Option<Value>) -> Vec<Condition> {
    let conditions: Vec<Condition> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(condition_item).collect(),
        _ => Vec::new(),
    };

    if conditions.is_empty() {
        tracing::debug!("Substituting unknown condition");
        return vec![Condition::unknown()];
    }

    conditions
}

/// Confidence of the first element the model sent, before any entries are
/// dropped. A first element that is not an object counts as 0.0. `None` when
/// there is no usable array, so the gate reads the substituted entry.
fn lead_confidence(value: Option<&Value>) -> Option<f64> {
    let first = value?.as_array()?.first()?;

    Some(
        first
            .as_object()
            .and_then(|o| o.get("confidence"))
            .map_or(0.0, coerce_confidence),
    )
}

fn condition_item(value: &Value) -> Option<Condition> {
    let object = value.as_object()?;

    let label = object
        .get("label")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(UNKNOWN_CONDITION_LABEL)
        .to_string();

    let confidence = object.get("confidence").map_or(0.0, coerce_confidence);

    Some(Condition { label, confidence })
}

/// Numeric value of a confidence field, clamped to [0, 1]; 0.0 if unusable.
fn coerce_confidence(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 1.0)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
