// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the review guard service.
//!
//! All `/api/` routes pass the per-IP api limiter first. Review submissions
//! additionally pass the per-IP review limiter, then the spam scorer.
//! Moderation routes are restricted to the configured admin IPs.
//!
//! The client is the socket peer; `X-Forwarded-For` is only read when the
//! peer is a configured trusted proxy.

use crate::clock::SharedClock;
use crate::config::Config;
use crate::error::{retry_after_secs, ApiError};
use crate::limiter::{RateLimitResult, RateLimiters};
use crate::metrics::Metrics;
use crate::review::{Review, ReviewStore, ReviewSubmission};
use crate::spam::{SpamReason, SpamScorer};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, ConnectInfo, FromRequestParts, Path, Query, Request, State},
    http::{
        header::{self, HeaderValue},
        request::Parts,
        Extensions, HeaderMap, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

const ACCEPTED_MESSAGE: &str = "Yorumunuz başarıyla gönderildi!";

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub scorer: SpamScorer,
    pub limiters: Arc<RateLimiters<SharedClock>>,
    pub store: ReviewStore,
    pub metrics: Metrics,
    admin_ips: Vec<IpAddr>,
    trusted_proxies: Vec<IpAddr>,
}

impl AppState {
    pub fn new(config: Config, clock: SharedClock) -> Result<Self, prometheus::Error> {
        let limiters = RateLimiters::with_clock(config.rate_limit.api, config.rate_limit.reviews, clock);

        Ok(Self {
            scorer: SpamScorer::new(config.spam.clone()),
            limiters: Arc::new(limiters),
            store: ReviewStore::new(),
            metrics: Metrics::new()?,
            admin_ips: parse_ips(&config.admin.allowed_ips, "admin"),
            trusted_proxies: parse_ips(&config.trusted_proxies, "trusted proxy"),
            config,
        })
    }

    /// Client address of a request; see [`ClientIp::resolve`].
    pub fn client_ip(&self, headers: &HeaderMap, extensions: &Extensions) -> ClientIp {
        ClientIp::resolve(headers, extensions, &self.trusted_proxies)
    }

    /// Admin routes are open to the configured IPs only; an unknown client
    /// address is never an admin.
    fn require_admin(&self, client: &ClientIp) -> Result<(), ApiError> {
        match client.0.parse::<IpAddr>() {
            Ok(ip) if self.admin_ips.contains(&ip) => Ok(()),
            _ => {
                warn!(ip = %client.0, "Admin access denied");
                Err(ApiError::Forbidden)
            }
        }
    }
}

fn parse_ips(ips: &[String], kind: &'static str) -> Vec<IpAddr> {
    ips.iter()
        .filter_map(|ip| match ip.parse() {
            Ok(ip) => Some(ip),
            Err(_) => {
                warn!(ip = %ip, kind, "Ignoring unparsable IP");
                None
            }
        })
        .collect()
}

/// Client address used for rate limiting and admin checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    /// The socket peer, unless the peer is a trusted proxy.
    ///
    /// Behind trusted proxies the `X-Forwarded-For` chain is walked from the
    /// nearest hop outwards and the first untrusted address is the client.
    /// Hops left of that address are client-supplied and never read. Without
    /// connection info the client is `"unknown"`.
    pub fn resolve(headers: &HeaderMap, extensions: &Extensions, trusted: &[IpAddr]) -> Self {
        let Some(ConnectInfo(peer)) = extensions.get::<ConnectInfo<SocketAddr>>() else {
            return Self("unknown".to_string());
        };

        let mut client = peer.ip();
        if trusted.contains(&client) {
            'chain: for value in headers.get_all("x-forwarded-for").iter().rev() {
                let Ok(value) = value.to_str() else {
                    break;
                };
                for hop in value.rsplit(',').map(str::trim) {
                    match hop.parse::<IpAddr>() {
                        Ok(ip) => {
                            client = ip;
                            if !trusted.contains(&ip) {
                                break 'chain;
                            }
                        }
                        Err(_) => break 'chain,
                    }
                }
            }
        }
        Self(client.to_string())
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.client_ip(&parts.headers, &parts.extensions))
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Query string of the review listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
}

/// Review submission response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub id: Uuid,
    pub is_spam: bool,
    pub message: &'static str,
    pub reasons: Vec<SpamReason>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/reviews", get(list_reviews).post(submit_review))
        .route("/reviews/:id", delete(delete_review))
        .layer(middleware::from_fn_with_state(state.clone(), api_rate_limit));

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .nest("/api", api);

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
        .with_state(state)
}

/// Per-IP limit on every `/api/` request.
async fn api_rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = state.client_ip(request.headers(), request.extensions());

    match state.limiters.api.check(&client.0) {
        RateLimitResult::Allowed { remaining, .. } => {
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            Ok(response)
        }
        RateLimitResult::Limited { retry_after } => {
            info!(
                ip = %client.0,
                path = %request.uri().path(),
                retry_after_secs = retry_after_secs(retry_after),
                "API request rate limited"
            );
            state.metrics.record_rate_limited("api");
            Err(ApiError::RateLimited { retry_after })
        }
    }
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "review-guard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics.encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

/// List published reviews, or every review for admins with `?all=true`.
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    client: ClientIp,
    Query(params): Query<ListParams>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    if params.all {
        state.require_admin(&client)?;
    }
    let reviews = state.store.list(params.all).await;
    debug!(count = reviews.len(), all = params.all, "Listing reviews");
    Ok(Json(ReviewsResponse { reviews }))
}

/// Accept a review: rate limit, validate, score and store it.
///
/// Spam is stored unapproved for moderators and reported back to the
/// author with a localized rejection message.
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    client: ClientIp,
    payload: Result<Json<ReviewSubmission>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    if let RateLimitResult::Limited { retry_after } = state.limiters.reviews.check(&client.0) {
        info!(ip = %client.0, retry_after_secs = retry_after_secs(retry_after), "Review submission rate limited");
        state.metrics.record_rate_limited("reviews");
        return Err(ApiError::RateLimited { retry_after });
    }

    let Json(submission) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let submission = submission.validate()?;

    let analysis = state.scorer.analyze(&submission.text, &submission.name);
    let review = Review::from_submission(submission, &analysis, chrono::Utc::now());
    let id = state.store.insert(review).await;
    state.metrics.record_review(analysis.is_spam);

    let message = if analysis.is_spam {
        warn!(
            ip = %client.0,
            %id,
            score = analysis.spam_score,
            terms = ?analysis.matched_terms,
            "Review flagged as spam"
        );
        analysis.rejection_message()
    } else {
        info!(ip = %client.0, %id, "Review accepted");
        ACCEPTED_MESSAGE
    };

    Ok(Json(SubmitResponse {
        success: true,
        id,
        is_spam: analysis.is_spam,
        message,
        reasons: analysis.reasons,
    }))
}

/// Delete a review (moderation).
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    client: ClientIp,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    state.require_admin(&client)?;

    if !state.store.delete(id).await {
        return Err(ApiError::NotFound(id));
    }
    info!(ip = %client.0, %id, "Review deleted");
    Ok((StatusCode::OK, Json(DeleteResponse { success: true })))
}
