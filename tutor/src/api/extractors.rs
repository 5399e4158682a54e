use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::TutorError;

/// `Json` extractor whose rejections become v1 `invalid_request` envelopes.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(TutorError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for TutorError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> TutorError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                TutorError::Validation(format!("Missing required field: {field}"))
            } else {
                TutorError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            TutorError::Validation(format!("JSON syntax error: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            TutorError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            TutorError::Internal("Failed to read request body".to_string())
        }
        _ => TutorError::Validation(rejection.to_string()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_field() {
        assert_eq!(
            extract_missing_field("Failed to deserialize: missing field `question` at line 1"),
            Some("question")
        );
        assert_eq!(extract_missing_field("expected a string"), None);
    }
}
