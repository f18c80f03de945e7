/// Domain-level validation errors raised before anything is persisted or
/// dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A mandatory field was absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A JSON payload (request body, headers, variables) could not be used.
    #[error("Invalid {field} payload: {message}")]
    InvalidPayload {
        field: &'static str,
        message: String,
    },

    /// The HTTP method is not one the relay supports.
    #[error("Unsupported HTTP method: {0}")]
    InvalidMethod(String),

    /// Any other rule violation.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn invalid_payload(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            CoreError::MissingField("url").to_string(),
            "Missing required field: url"
        );
        assert_eq!(
            CoreError::invalid_payload("body", "expected value").to_string(),
            "Invalid body payload: expected value"
        );
        assert_eq!(
            CoreError::InvalidMethod("TRACE".into()).to_string(),
            "Unsupported HTTP method: TRACE"
        );
    }
}
