//! Response bodies for chat endpoints.

use serde::Serialize;

use crate::domain::chat::ChatError;

/// Error response body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    /// Body for a failed history read. The cause stays in the logs.
    pub fn history_unavailable(err: &ChatError) -> Self {
        Self::new(err.code().to_string(), "Failed to fetch chat history")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_error_hides_cause() {
        let response = ErrorResponse::history_unavailable(&ChatError::persistence("db down"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "Failed to fetch chat history");
        assert_eq!(json["code"], "DATABASE_ERROR");
    }
}
