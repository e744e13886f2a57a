/// Hides server files that share the public directory
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

const BLOCKED_PATHS: [&str; 4] = ["/server.js", "/package.json", "/.env", "/.env.example"];

/// True for paths that must never be served.
///
/// The check runs on the decoded path with empty segments dropped, the same
/// shape `ServeDir` resolves against the disk. Undecodable paths are blocked.
pub fn is_blocked(path: &str) -> bool {
    let Ok(decoded) = urlencoding::decode(path) else {
        return true;
    };

    let segments: Vec<&str> = decoded.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|segment| segment.starts_with('.')) {
        return true;
    }

    let normalized = format!("/{}", segments.join("/"));
    BLOCKED_PATHS.contains(&normalized.as_str())
}

/// Answer blocked paths with an empty 404 before they reach the file service
pub async fn block_private_paths(request: Request, next: Next) -> Response {
    if is_blocked(request.uri().path()) {
        tracing::debug!("Blocked request for {}", request.uri().path());
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(request).await
}
