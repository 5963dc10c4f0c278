// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact Relay
//!
//! Accepts contact form submissions from the QA portfolio site and relays
//! them by email:
//!
//! - Per-client rate limiting (5 submissions per hour default)
//! - Field validation reporting every violation at once
//! - HTML and plain text notification rendering
//! - Delivery through the Resend email API

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod template;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::ContactError;
pub use handlers::AppState;
pub use limiter::{RateLimitResult, RateLimiter};
pub use mailer::{DispatchReceipt, EmailMessage, Mailer, MailerError, ResendMailer};
pub use validator::{ContactSubmission, ContactValidator, FieldError, ValidationResult};

use axum::{extract::DefaultBodyLimit, http::Method, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health))
        .route(
            "/api/contact",
            get(handlers::contact_info).post(handlers::submit_contact),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(handlers::MAX_BODY_BYTES)),
        )
        .with_state(state)
}
