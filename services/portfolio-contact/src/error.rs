// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for the contact relay

use crate::limiter::RateLimitReason;
use crate::mailer::MailerError;
use crate::validator::FieldError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Every way a contact submission can fail.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{reason}")]
    RateLimited {
        reason: RateLimitReason,
        retry_after: Duration,
    },

    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    #[error("RESEND_API_KEY is not configured")]
    ConfigMissing,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Email dispatch failed: {0}")]
    DispatchFailed(#[from] MailerError),

    #[error("Internal error: {0}")]
    Unexpected(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ContactError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ContactError::ConfigMissing
            | ContactError::MalformedBody(_)
            | ContactError::DispatchFailed(_)
            | ContactError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log at the level the failure deserves. Expected, caller-caused
    /// failures are not errors.
    fn log(&self) {
        match self {
            ContactError::RateLimited { retry_after, .. } => {
                info!(retry_after_secs = retry_after.as_secs(), "Submission rate limited");
            }
            ContactError::ValidationFailed(fields) => {
                debug!(violations = fields.len(), "Submission failed validation");
            }
            ContactError::ConfigMissing => {
                error!("RESEND_API_KEY is not configured");
            }
            ContactError::DispatchFailed(err) => {
                error!(error = %err, "Email provider error");
            }
            ContactError::MalformedBody(detail) => {
                error!(error = %detail, "Contact form error: malformed body");
            }
            ContactError::Unexpected(detail) => {
                error!(error = %detail, "Contact form error");
            }
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();

        match self {
            ContactError::RateLimited {
                reason,
                retry_after,
            } => (
                status,
                [(header::RETRY_AFTER, retry_after.as_secs().to_string())],
                Json(ErrorResponse::new(reason.to_string())),
            )
                .into_response(),
            ContactError::ValidationFailed(fields) => (
                status,
                Json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    details: Some(fields),
                }),
            )
                .into_response(),
            ContactError::ConfigMissing => (
                status,
                Json(ErrorResponse::new("Email service is not configured")),
            )
                .into_response(),
            ContactError::DispatchFailed(_) => (
                status,
                Json(ErrorResponse::new(
                    "Failed to send email. Please try again later.",
                )),
            )
                .into_response(),
            ContactError::MalformedBody(_) | ContactError::Unexpected(_) => {
                (status, Json(ErrorResponse::new("Internal server error"))).into_response()
            }
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ContactError>;
