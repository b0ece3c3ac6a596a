//! Typed failures for gateway fetches and payload decoding.
//!
//! Each failure is scoped to a single endpoint so the view fed by that
//! endpoint can show it as a notice while sibling views keep rendering.

use thiserror::Error;

/// Shared `Result` alias for gateway and payload operations.
pub type Result<T> = std::result::Result<T, SentidashError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentidashError {
    /// Transport failure, timeout, or a non-2xx status.
    #[error("[SD-1001] fetch failed for {endpoint}: {details}")]
    FetchFailed {
        endpoint: &'static str,
        details: String,
    },

    /// Outer or inner JSON could not be parsed, a field is missing, or the
    /// decoded shape violates the payload's invariants.
    #[error("[SD-2001] invalid payload from {endpoint}: {details}")]
    PayloadShapeInvalid {
        endpoint: &'static str,
        details: String,
    },
}

impl SentidashError {
    pub fn fetch_failed(endpoint: &'static str, details: impl Into<String>) -> Self {
        Self::FetchFailed {
            endpoint,
            details: details.into(),
        }
    }

    pub fn shape_invalid(endpoint: &'static str, details: impl Into<String>) -> Self {
        Self::PayloadShapeInvalid {
            endpoint,
            details: details.into(),
        }
    }

    /// Stable machine-parseable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } => "SD-1001",
            Self::PayloadShapeInvalid { .. } => "SD-2001",
        }
    }

    /// Endpoint path the failure belongs to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::FetchFailed { endpoint, .. } | Self::PayloadShapeInvalid { endpoint, .. } => {
                endpoint
            }
        }
    }

    /// Short message shown inside the affected view.
    pub fn user_message(&self) -> String {
        match self {
            Self::FetchFailed { details, .. } => {
                format!("Could not reach the data gateway: {}", details)
            }
            Self::PayloadShapeInvalid { details, .. } => {
                format!("Gateway sent data this view cannot show: {}", details)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_endpoint() {
        let err = SentidashError::fetch_failed("/get_data", "connection refused");
        let msg = err.to_string();
        assert!(msg.contains("SD-1001"), "{msg}");
        assert!(msg.contains("/get_data"), "{msg}");
        assert!(msg.contains("connection refused"), "{msg}");
    }

    #[test]
    fn test_codes_are_distinct() {
        let fetch = SentidashError::fetch_failed("/update_rows", "");
        let shape = SentidashError::shape_invalid("/update_rows", "");
        assert_ne!(fetch.code(), shape.code());
        assert_eq!(fetch.endpoint(), shape.endpoint());
    }

    #[test]
    fn test_user_message_omits_code() {
        let err = SentidashError::shape_invalid("/update_card_values", "expected 4 cards, got 2");
        let msg = err.user_message();
        assert!(!msg.contains("SD-"));
        assert!(msg.ends_with("expected 4 cards, got 2"));
    }
}
