// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound email dispatch.
//!
//! `Mailer` is the seam between the submission handler and the email
//! provider. `ResendMailer` talks to the Resend HTTP API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// An email ready to hand to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Provider acknowledgement of an accepted email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub id: String,
}

/// Dispatch failures.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email provider rejected the message ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid email provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Delivers composed emails.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<DispatchReceipt, MailerError>;
}

/// Error body returned by the Resend API.
#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Resend API client
pub struct ResendMailer {
    endpoint: Url,
    api_key: String,
    client: reqwest::Client,
}

impl ResendMailer {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, api_key, client)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(
        base_url: &str,
        api_key: String,
        client: reqwest::Client,
    ) -> Result<Self, MailerError> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        Ok(Self {
            endpoint: base.join("emails")?,
            api_key,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<DispatchReceipt, MailerError> {
        debug!(endpoint = %self.endpoint, subject = %message.subject, "Dispatching email");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let receipt: DispatchReceipt = response.json().await?;
            debug!(id = %receipt.id, "Email accepted by provider");
            Ok(receipt)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailerError::Rejected {
                status,
                message: provider_message(&body),
            })
        }
    }
}

/// Pull the human-readable part out of a provider error body.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ProviderError>(body) {
        Ok(ProviderError {
            message: Some(message),
            ..
        }) => message,
        Ok(ProviderError {
            name: Some(name), ..
        }) => name,
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body.trim().to_string(),
    }
}
