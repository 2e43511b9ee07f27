//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use domain::services::{EventCache, SubmissionService};
use persistence::repositories::{EventRepository, RegistrationRepository};

use crate::config::Config;
use crate::middleware::metrics::{metrics_handler, metrics_middleware};
use crate::middleware::security_headers::security_headers_middleware;
use crate::middleware::trace_id::trace_id;
use crate::routes;
use crate::services::{EmailNotifier, EmailService};

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub events: Arc<EventRepository>,
    pub registrations: Arc<RegistrationRepository>,
    pub event_cache: Arc<EventCache>,
    pub submissions: Arc<SubmissionService>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let events = Arc::new(EventRepository::new(pool.clone()));
        let registrations = Arc::new(RegistrationRepository::new(pool.clone()));

        let event_cache = Arc::new(EventCache::new(
            events.clone(),
            Duration::from_secs(config.cache.event_ttl_secs),
        ));

        let notifier = Arc::new(EmailNotifier::new(EmailService::new(config.email.clone())));
        let submissions = Arc::new(SubmissionService::new(registrations.clone(), notifier));

        Self {
            pool,
            config: Arc::new(config),
            events,
            registrations,
            event_cache,
            submissions,
        }
    }
}

/// Creates the application router with all routes and middleware.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);
    let cors = cors_layer(&config.security.cors_origins);
    let state = AppState::new(config, pool);

    Router::new()
        .route(
            "/api/v1/registrations",
            post(routes::registrations::submit_registration),
        )
        .route(
            "/api/v1/registrations/:token",
            get(routes::registrations::lookup_registration),
        )
        .route("/api/v1/events", get(routes::events::list_events))
        .route("/api/v1/events/:event_id", get(routes::events::get_event))
        .route("/api/health", get(routes::health::health))
        .route("/api/health/live", get(routes::health::liveness))
        .route("/api/health/ready", get(routes::health::readiness))
        .route("/metrics", get(metrics_handler))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

/// Builds the CORS layer from configured origins.
///
/// With no origins configured, browsers on other origins are refused;
/// the public site must be listed explicitly in production.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skips_bad_origins() {
        // Header values refuse embedded newlines; the good origin survives.
        let origins = vec![
            "https://society.example.org".to_string(),
            "bad\norigin".to_string(),
        ];
        let _layer = cors_layer(&origins);
    }
}
