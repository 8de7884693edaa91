use once_cell::sync::Lazy;
use regex::Regex;

use super::DelegateError;
use crate::model::StructuredResponse;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```json\n?|\n?```").expect("invalid code fence pattern"));

/// Removes Markdown code fences (` ```json ` or bare ` ``` `) that models
/// like to wrap JSON in.
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

/// Parses completion text into a study card. The card is accepted only if it
/// deserializes into one of the seven shapes and passes `validate()`.
pub fn parse_model_output(raw: &str) -> Result<StructuredResponse, DelegateError> {
    let cleaned = strip_code_fences(raw);
    let response: StructuredResponse = serde_json::from_str(&cleaned)?;
    response.validate()?;
    Ok(response)
}
