// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-process application fixture.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use portfolio_contact::{
    router, AppState, Config, DispatchReceipt, EmailMessage, Mailer, MailerError, ManualClock,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Mailer that records every message and optionally rejects them.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    reject_with: Option<String>,
}

impl RecordingMailer {
    pub fn rejecting(message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject_with: Some(message.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<DispatchReceipt, MailerError> {
        if let Some(reason) = &self.reject_with {
            return Err(MailerError::Rejected {
                status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
                message: reason.clone(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(DispatchReceipt {
            id: format!("email-{}", sent.len()),
        })
    }
}

/// A running app plus handles on its collaborators.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    pub mailer: Option<Arc<RecordingMailer>>,
}

impl TestApp {
    /// App with a working mailer.
    pub fn new() -> Self {
        Self::build(Config::default(), Some(Arc::new(RecordingMailer::default())))
    }

    /// App whose mailer is configured but rejects every message.
    pub fn with_rejecting_mailer(reason: &str) -> Self {
        Self::build(
            Config::default(),
            Some(Arc::new(RecordingMailer::rejecting(reason))),
        )
    }

    /// App with no email credential configured.
    pub fn unconfigured() -> Self {
        Self::build(Config::default(), None)
    }

    pub fn build(config: Config, mailer: Option<Arc<RecordingMailer>>) -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 4, 14, 10, 30, 0).unwrap(),
        ));
        let dyn_mailer = mailer.clone().map(|m| m as Arc<dyn Mailer>);
        let state = Arc::new(AppState::new(config, clock.clone(), dyn_mailer).unwrap());
        Self {
            state,
            clock,
            mailer,
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.mailer.as_ref().map(|m| m.sent()).unwrap_or_default()
    }

    /// POST a raw body to `/api/contact` from `client`.
    pub async fn post_raw(&self, client: Option<&str>, body: impl Into<Body>) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header("content-type", "application/json");
        if let Some(ip) = client {
            request = request.header("x-forwarded-for", ip);
        }
        self.router()
            .oneshot(request.body(body.into()).unwrap())
            .await
            .unwrap()
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post(&self, client: &str, body: &Value) -> (StatusCode, Value) {
        let response = self.post_raw(Some(client), body.to_string()).await;
        read_json(response).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router().oneshot(request).await.unwrap();
        read_json(response).await
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
