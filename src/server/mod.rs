//! HTTP transport for the report service

mod error;
mod handlers;

pub use error::ApiError;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

use crate::config::Settings;
use crate::llm::CompletionBackend;
use crate::report::ReportGenerator;

const ROOT_REQUESTS_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Separate quota per client address
type RootRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Shared by every request; holds no per-request state
pub struct AppState<B> {
    pub generator: ReportGenerator<B>,
    root_limiter: RootRateLimiter,
}

impl<B: CompletionBackend> AppState<B> {
    pub fn new(generator: ReportGenerator<B>) -> Self {
        Self {
            generator,
            root_limiter: RateLimiter::keyed(Quota::per_minute(ROOT_REQUESTS_PER_MINUTE)),
        }
    }
}

/// Handlers read the client address, so serve with
/// `into_make_service_with_connect_info::<SocketAddr>()`
pub fn build_router<B>(state: AppState<B>, settings: &Settings) -> Router
where
    B: CompletionBackend + 'static,
{
    Router::new()
        .route("/", get(handlers::root::<B>))
        .route("/reports/generate", post(handlers::generate_report::<B>))
        .layer(cors_layer(settings))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %Uuid::new_v4(),
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(Arc::new(state))
}

/// `*` allows any origin without credentials; an explicit list allows credentials
fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings.allowed_origins_list();
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}
