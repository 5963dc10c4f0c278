// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact Relay Service
//!
//! Serves `POST /api/contact` for the portfolio site's contact form.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables, with an optional
//! `.env` file:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:3000)
//! - `RESEND_API_KEY`: Resend credential (required for delivery)
//! - `CONTACT_EMAIL`: Recipient address
//! - `CONTACT_FROM`: Sender address
//! - `RESEND_API_URL`: Email API base URL (default: https://api.resend.com)
//! - `RATE_LIMIT_MAX_REQUESTS`: Submissions per window per client (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 3600)
//! - `RATE_LIMIT_SWEEP_SECS`: Expired entry sweep interval (default: 300)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_contact::{
    clock::{Clock, SystemClock},
    config::Config,
    handlers::AppState,
    mailer::{Mailer, ResendMailer},
    router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        recipient = %config.email.to,
        "Starting portfolio contact relay"
    );

    let mailer: Option<Arc<dyn Mailer>> = match config.email.api_key() {
        Some(key) => Some(Arc::new(ResendMailer::new(
            &config.email.api_base_url,
            key.to_string(),
            config.email.timeout(),
        )?)),
        None => {
            warn!("RESEND_API_KEY is not configured; submissions will be rejected");
            None
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = Arc::new(AppState::new(config.clone(), clock, mailer)?);

    // Spawn sweep task
    let sweep_state = state.clone();
    let sweep_interval = config.rate_limit.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let removed = sweep_state.limiter.sweep().await;
            if removed > 0 {
                info!(removed, "Swept expired rate limit entries");
            }
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
