// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact relay.
//!
//! A submission runs identify, rate-check, parse, validate, configuration
//! check, compose, dispatch and respond, in that order. Every failure ends
//! the request; nothing is retried or queued.

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{ContactError, Result};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::mailer::{EmailMessage, Mailer};
use crate::template::EmailRenderer;
use crate::validator::ContactValidator;
use axum::extract::{rejection::BytesRejection, State};
use axum::{body::Bytes, http::HeaderMap, Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Identifier used when no client address header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Largest request body read for a submission.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub validator: ContactValidator,
    pub renderer: EmailRenderer,
    /// `None` when no provider credential is configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub config: Config,
}

impl AppState {
    /// Build the state for `config`. Pass `mailer: None` when no provider
    /// credential is available; submissions then fail as not configured.
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> std::result::Result<Self, handlebars::TemplateError> {
        Ok(Self {
            limiter: RateLimiter::new(config.rate_limit.clone(), clock.clone()),
            validator: ContactValidator::new(config.validation.clone()),
            renderer: EmailRenderer::new(config.email.escape_html, clock)?,
            mailer,
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Static identification payload for `GET /api/contact`.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: &'static str,
}

/// Successful submission response.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: SubmitData,
}

#[derive(Debug, Serialize)]
pub struct SubmitData {
    pub id: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "portfolio-contact",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /api/contact`. Touches no state.
pub async fn contact_info() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Contact API endpoint",
    })
}

/// Derive the rate limit key for a request.
///
/// Uses the first non-blank hop of `X-Forwarded-For`, then `X-Real-IP`,
/// then [`UNKNOWN_CLIENT`].
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').map(str::trim).find(|hop| !hop.is_empty()));

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// `POST /api/contact`: validate a contact form submission and relay it by
/// email.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<SubmitResponse>> {
    let client = client_identifier(&headers);

    if let RateLimitResult::Limited {
        reason,
        retry_after,
    } = state.limiter.check(&client).await
    {
        debug!(client = %client, "Rejecting submission over limit");
        return Err(ContactError::RateLimited {
            reason,
            retry_after,
        });
    }

    // Unreadable or oversized bodies count against the limit like bad JSON.
    let body = body.map_err(|e| ContactError::MalformedBody(e.body_text()))?;
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ContactError::MalformedBody(e.to_string()))?;

    let submission = state
        .validator
        .validate(&raw)
        .into_result()
        .map_err(ContactError::ValidationFailed)?;

    let mailer = state.mailer.as_ref().ok_or(ContactError::ConfigMissing)?;

    let rendered = state
        .renderer
        .render(&submission)
        .map_err(|e| ContactError::Unexpected(e.to_string()))?;

    let message = EmailMessage {
        from: state.config.email.from.clone(),
        to: vec![state.config.email.to.clone()],
        reply_to: submission.email.clone(),
        subject: rendered.subject,
        html: rendered.html,
        text: rendered.text,
    };

    let receipt = mailer.send(&message).await?;

    info!(
        client = %client,
        project_type = %submission.project_type,
        id = %receipt.id,
        "Contact email sent"
    );

    Ok(Json(SubmitResponse {
        success: true,
        message: "Email sent successfully!",
        data: SubmitData { id: receipt.id },
    }))
}
