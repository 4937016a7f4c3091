//! UI/backend events and error modeling for the desktop GUI controller.

use shared::{error::SubmitError, protocol::ResultPayload};

use crate::ui::app::PreviewImage;

pub enum UiEvent {
    Info(String),
    PredictionSettled {
        outcome: Result<ResultPayload, SubmitError>,
    },
    ArtifactPreviewLoaded {
        filename: String,
        image: PreviewImage,
    },
    ArtifactPreviewFailed {
        filename: String,
        reason: String,
    },
    ArtifactSaved {
        filename: String,
        path: std::path::PathBuf,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Service,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Predict,
    ArtifactFetch,
    General,
}

pub fn classify_service_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure")
        || lower.contains("failed to build backend runtime")
    {
        "Backend worker startup failure; verify local app environment and restart.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Prediction service unreachable; check the API URL/network and retry.".to_string()
    } else {
        format!("Prediction service error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("dns")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("prediction service")
            || message_lower.contains("no valid predictions")
            || message_lower.contains("service")
        {
            UiErrorCategory::Service
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Startup failures are unrecoverable within the session and get a
    /// persistent banner rather than a transient status line.
    pub fn is_startup_failure(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Service => "Service",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_connection_refusal_as_transport() {
        let err = UiError::from_message(UiErrorContext::Predict, "connection refused (os error 111)");
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(!err.is_startup_failure());
    }

    #[test]
    fn classifies_no_valid_predictions_as_service() {
        let err = UiError::from_message(
            UiErrorContext::Predict,
            "No valid predictions could be generated for the requested symbols",
        );
        assert_eq!(err.category(), UiErrorCategory::Service);
    }

    #[test]
    fn classifies_malformed_payload_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "invalid prediction response payload: EOF while parsing",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn startup_context_is_flagged_for_banner_display() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime",
        );
        assert!(err.is_startup_failure());
    }

    #[test]
    fn unreachable_service_gets_friendly_retry_hint() {
        let hint = classify_service_failure("error sending request: connection refused");
        assert!(hint.contains("unreachable"));
    }

    #[test]
    fn other_failures_keep_original_message() {
        let hint = classify_service_failure("No valid predictions could be generated");
        assert!(hint.contains("No valid predictions"));
    }
}
