use serde::{Deserialize, Serialize};

/// The body the API sends along with an error status, when it sends one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JsonError {
    /// Extract a human message from an error body. Falls back to the raw body.
    pub fn message_of(body: &str) -> String {
        match serde_json::from_str::<JsonError>(body) {
            Ok(JsonError {
                message: Some(message),
                ..
            }) => message,
            Ok(JsonError {
                error: Some(error), ..
            }) => error,
            _ => body.trim().to_string(),
        }
    }
}
