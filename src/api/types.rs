use serde_json::Value;

use crate::error::ApiError;

/// Pulls `message` out of an ask body. The body must be JSON other than
/// `null`; the message must be a string with at least one non-whitespace
/// character.
pub fn ask_message(body: &[u8]) -> Result<String, ApiError> {
    let value: Value = serde_json::from_slice(body)?;
    if value.is_null() {
        return Err(ApiError::NullBody);
    }
    match value.get("message").and_then(Value::as_str) {
        Some(message) if !message.trim().is_empty() => Ok(message.to_string()),
        _ => Err(ApiError::MissingMessage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_string_message() {
        assert_eq!(
            ask_message(br#"{"message":"Explain recursion","extra":1}"#).unwrap(),
            "Explain recursion"
        );
    }

    #[test]
    fn rejects_missing_non_string_and_blank_messages() {
        let bodies: [&[u8]; 7] = [
            br#"{}"#,
            br#"{"message":null}"#,
            br#"{"message":42}"#,
            br#"{"message":["hi"]}"#,
            br#"{"message":"  \n "}"#,
            br#"[]"#,
            br#""hello""#,
        ];
        for body in bodies {
            assert!(matches!(ask_message(body), Err(ApiError::MissingMessage)));
        }
    }

    #[test]
    fn non_json_is_malformed() {
        let bodies: [&[u8]; 3] = [b"message=hi", b"", b"{\"message\":"];
        for body in bodies {
            assert!(matches!(ask_message(body), Err(ApiError::MalformedBody(_))));
        }
    }

    #[test]
    fn null_body_is_not_a_missing_message() {
        assert!(matches!(ask_message(b"null"), Err(ApiError::NullBody)));
        assert!(matches!(ask_message(b"  null \n"), Err(ApiError::NullBody)));
    }
}
