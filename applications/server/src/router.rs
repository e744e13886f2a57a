/// Router assembly
use crate::{api, api::contact::MAX_BODY_SIZE, middleware, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{
    compression::CompressionLayer,
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// API routes under `/api`, everything else from `public_dir`
pub fn create_router(app_state: AppState, public_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route(
            "/contact",
            post(api::contact::submit).layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        );

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(axum_middleware::from_fn(middleware::block_private_paths))
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .with_state(app_state)
}
