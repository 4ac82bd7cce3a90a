use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures of the automation core.
///
/// Every public operation returns one of these instead of letting a host
/// fault escape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomationError {
    #[error("No host connection is bound")]
    NotConnected,

    #[error("Automation control is disabled")]
    ControlDisabled,

    #[error("Invalid gesture: {reason}")]
    InvalidGesture { reason: String },

    #[error("Gesture dispatch failed: {cause}")]
    Dispatch { cause: String },

    #[error("Focus query failed: {cause}")]
    FocusQuery { cause: String },

    #[error("No focused editable node")]
    NoEditableFocus,

    #[error("Text injection failed: {cause}")]
    Injection { cause: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Automation(#[from] AutomationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    ValidationError(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
}

impl AppError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Automation(e) => match e {
                AutomationError::NotConnected => (StatusCode::SERVICE_UNAVAILABLE, "Not Connected"),
                AutomationError::ControlDisabled => (StatusCode::FORBIDDEN, "Control Disabled"),
                AutomationError::InvalidGesture { .. } => (StatusCode::BAD_REQUEST, "Bad Request"),
                AutomationError::NoEditableFocus => (StatusCode::CONFLICT, "No Editable Focus"),
                AutomationError::Dispatch { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Dispatch Error")
                }
                AutomationError::FocusQuery { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Focus Query Error")
                }
                AutomationError::Injection { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Injection Error")
                }
            },
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status();

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AutomationError::NotConnected, StatusCode::SERVICE_UNAVAILABLE),
            (AutomationError::ControlDisabled, StatusCode::FORBIDDEN),
            (AutomationError::NoEditableFocus, StatusCode::CONFLICT),
            (
                AutomationError::InvalidGesture {
                    reason: "off screen".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AutomationError::Dispatch {
                    cause: "boom".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = AppError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let rejection = Json::<serde_json::Value>::from_bytes(b"{not json").unwrap_err();
        let err = AppError::from(rejection);
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_messages() {
        let err = AutomationError::Injection {
            cause: "node vanished".to_string(),
        };
        assert_eq!(err.to_string(), "Text injection failed: node vanished");
        assert_eq!(
            AppError::from(AutomationError::NotConnected).to_string(),
            "No host connection is bound"
        );
    }
}
