// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome collection for submission replay.

use axum::http::StatusCode;
use std::collections::HashMap;

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Sent,
    RateLimited,
    ValidationFailed,
    ServerError,
}

impl Outcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => Outcome::Sent,
            StatusCode::TOO_MANY_REQUESTS => Outcome::RateLimited,
            StatusCode::BAD_REQUEST => Outcome::ValidationFailed,
            _ => Outcome::ServerError,
        }
    }
}

/// Collects outcomes during a replay.
#[derive(Debug, Default)]
pub struct ReplayMetrics {
    outcomes: HashMap<Outcome, usize>,
    per_client: HashMap<String, HashMap<Outcome, usize>>,
}

impl ReplayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome.
    pub fn record(&mut self, client: &str, status: StatusCode) {
        let outcome = Outcome::from_status(status);
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self
            .per_client
            .entry(client.to_string())
            .or_default()
            .entry(outcome)
            .or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Count for one client.
    pub fn client_count(&self, client: &str, outcome: Outcome) -> usize {
        self.per_client
            .get(client)
            .and_then(|m| m.get(&outcome))
            .copied()
            .unwrap_or(0)
    }

    pub fn unique_clients(&self) -> usize {
        self.per_client.len()
    }
}

impl std::fmt::Display for ReplayMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Replay Report ===")?;
        writeln!(f, "Total:             {}", self.total())?;
        writeln!(f, "Clients:           {}", self.unique_clients())?;
        writeln!(f, "Sent:              {}", self.count(Outcome::Sent))?;
        writeln!(f, "Rate Limited:      {}", self.count(Outcome::RateLimited))?;
        writeln!(f, "Validation Failed: {}", self.count(Outcome::ValidationFailed))?;
        writeln!(f, "Server Error:      {}", self.count(Outcome::ServerError))?;
        Ok(())
    }
}
