//! Prompt text sent to assistant providers

use super::types::AssistantQuery;
use crate::domain::Result;

/// Instructions shared by every provider
pub const SYSTEM_PROMPT: &str = "You are a clinical assistant supporting licensed clinicians. \
Answer using only the patient record you are given and established clinical guidance. \
Do not diagnose and do not replace clinical judgement. \
Reply with a single JSON object and nothing else, shaped as: \
{\"answer\": string, \"confidence\": number between 0 and 1, \
\"timeline\": [{\"date\": \"YYYY-MM-DD\", \"event\": string}], \
\"insights\": [{\"category\": string, \"description\": string, \"confidence\": number}], \
\"recommendations\": [{\"description\": string, \"rationale\": string, \
\"priority\": \"high\" | \"medium\" | \"low\", \"confidence\": number}]}. \
Use empty arrays when a section has nothing to report.";

/// User turn: the serialized patient record, then the question
///
/// # Errors
///
/// Returns a serialization error if the patient context cannot be encoded
pub fn user_message(query: &AssistantQuery) -> Result<String> {
    match &query.context {
        Some(context) => {
            let record = serde_json::to_string_pretty(context)?;
            Ok(format!(
                "Patient record:\n```json\n{record}\n```\n\nQuestion: {}",
                query.question.trim()
            ))
        }
        None => Ok(format!("Question: {}", query.question.trim())),
    }
}

/// Single text prompt for providers without chat roles
pub fn combined_prompt(query: &AssistantQuery) -> Result<String> {
    Ok(format!("{SYSTEM_PROMPT}\n\n{}", user_message(query)?))
}
