// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Review Guard Service
//!
//! Accepts customer reviews for the taxi site, scores them for spam and
//! rate limits clients per IP.
//!
//! ## Routes
//!
//! - `GET /health`, `GET /healthz`
//! - `GET /metrics` (Prometheus, when enabled)
//! - `GET /api/reviews` (published reviews; `?all=true` for admins)
//! - `POST /api/reviews`
//! - `DELETE /api/reviews/:id` (admins)
//!
//! ## Configuration
//!
//! Environment variables (a `.env` file is read first):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `API_WINDOW_MS`, `API_MAX_REQUESTS`: per-IP API limit (default: 100 per minute)
//! - `REVIEW_WINDOW_MS`, `REVIEW_MAX_REQUESTS`: per-IP review limit (default: 5 per hour)
//! - `CLEANUP_INTERVAL_SECS`: expired window sweep interval (default: 3600)
//! - `SPAM_THRESHOLD`: spam score cutoff (default: 15)
//! - `ADMIN_ALLOWED_IPS`: comma-separated moderator IPs (default: loopback)
//! - `TRUSTED_PROXIES`: comma-separated proxy IPs whose `X-Forwarded-For` is honoured (default: none)
//! - `METRICS_ENABLED`: expose `/metrics` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use review_guard::{
    clock::SystemClock,
    config::Config,
    handlers::{router, AppState},
    limiter::spawn_cleanup,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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
        api_max_requests = config.rate_limit.api.max_requests,
        api_window_ms = config.rate_limit.api.window_ms,
        review_max_requests = config.rate_limit.reviews.max_requests,
        review_window_ms = config.rate_limit.reviews.window_ms,
        spam_threshold = config.spam.threshold,
        "Starting review guard"
    );

    let cleanup_interval = config.rate_limit.cleanup_interval();
    let addr: SocketAddr = config.bind_addr.parse()?;

    let state = Arc::new(AppState::new(config, Arc::new(SystemClock))?);
    spawn_cleanup(state.limiters.clone(), cleanup_interval);

    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
