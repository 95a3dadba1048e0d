//! Reshaping provider completions into [`AssistantResponse`]
//!
//! Providers are asked for a JSON object, but models wrap it in a markdown
//! fence often enough that both forms are accepted. Text that is not a JSON
//! object at all is kept as the answer with zero confidence.

use super::types::{
    clamp_confidence, AssistantResponse, ClinicalInsight, Priority, Recommendation, TimelineEvent,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawResponse {
    #[serde(alias = "content")]
    answer: Option<String>,
    confidence: Option<Value>,
    timeline: Vec<RawTimelineEvent>,
    insights: Vec<RawInsight>,
    recommendations: Vec<RawRecommendation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTimelineEvent {
    date: Option<String>,
    #[serde(alias = "description")]
    event: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInsight {
    category: Option<String>,
    description: Option<String>,
    confidence: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecommendation {
    description: Option<String>,
    rationale: Option<String>,
    priority: Option<String>,
    confidence: Option<Value>,
}

/// Parse a completion into a response
///
/// Item confidences default to the overall confidence when the model omits
/// them. Insights and recommendations under `min_confidence` are dropped.
pub fn parse_completion(text: &str, provider: &str, min_confidence: f64) -> AssistantResponse {
    let Some(raw) = structured_body(text) else {
        tracing::debug!(provider, "Completion is not JSON, keeping it as plain text");
        return AssistantResponse::unstructured(text.trim(), provider);
    };

    let confidence = raw.confidence.as_ref().and_then(number).map_or(0.0, clamp_confidence);
    let item_confidence =
        |value: &Option<Value>| value.as_ref().and_then(number).map_or(confidence, clamp_confidence);

    let timeline = raw
        .timeline
        .into_iter()
        .filter_map(|e| {
            let event = e.event.filter(|s| !s.trim().is_empty())?;
            Some(TimelineEvent {
                date: e.date.unwrap_or_default(),
                event,
            })
        })
        .collect();

    let insights = raw
        .insights
        .into_iter()
        .filter_map(|i| {
            let confidence = item_confidence(&i.confidence);
            let description = i.description.filter(|s| !s.trim().is_empty())?;
            Some(ClinicalInsight {
                category: i.category.unwrap_or_default(),
                description,
                confidence,
            })
        })
        .collect();

    let recommendations = raw
        .recommendations
        .into_iter()
        .filter_map(|r| {
            let confidence = item_confidence(&r.confidence);
            let description = r.description.filter(|s| !s.trim().is_empty())?;
            Some(Recommendation {
                description,
                rationale: r.rationale.unwrap_or_default(),
                priority: r.priority.as_deref().map_or(Priority::Medium, Priority::from_label),
                confidence,
            })
        })
        .collect();

    let mut response = AssistantResponse {
        answer: raw.answer.unwrap_or_default(),
        confidence,
        timeline,
        insights,
        recommendations,
        provider: provider.to_string(),
    };
    response.retain_confident(min_confidence);
    response
}

fn structured_body(text: &str) -> Option<RawResponse> {
    let candidate = fenced_block(text).unwrap_or(text).trim();
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Body of the first ``` fence, without its language tag
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let body_start = match rest.find('\n') {
        Some(newline) if !rest[..newline].trim_start().starts_with('{') => newline + 1,
        _ => 0,
    };
    let body = &rest[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    Some(&body[..end])
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok().map(|v| {
            if s.trim().ends_with('%') {
                v / 100.0
            } else {
                v
            }
        }),
        _ => None,
    }
}
