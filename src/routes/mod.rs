// src/routes/mod.rs
pub mod chat;

use std::net::SocketAddr;

use axum::{
    Router,
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::state::SharedState;
use chat::{chat_handler, health_handler, not_found_handler};

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config);

    let api_routes = Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(state.clone(), guard_middleware));

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_permissive() {
        return CorsLayer::very_permissive();
    }

    let allowed = config.allowed_origins.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin.to_str().is_ok_and(|o| origin_allowed(o, &allowed))
        }))
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ])
}

/// Origin allow-list plus per-IP rate window, applied before every /api
/// handler. Requests without an Origin header (curl, native apps) always
/// pass the origin check.
async fn guard_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.is_permissive() {
        if let Some(origin) = req.headers().get(header::ORIGIN) {
            let allowed = origin
                .to_str()
                .is_ok_and(|o| origin_allowed(o, &state.config.allowed_origins));
            if !allowed {
                tracing::warn!(origin = ?origin, "rejected cross-origin request");
                return Err(AppError::ForbiddenOrigin);
            }
        }
    }

    let key = client_key(&req);
    if !state.limiter.check(&key).await {
        tracing::warn!(client = %key, "rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(req).await)
}

fn origin_allowed(origin: &str, allowlist: &[String]) -> bool {
    is_loopback_origin(origin) || allowlist.iter().any(|o| o == origin)
}

/// `http(s)://localhost` or `http(s)://127.0.0.1`, any port.
fn is_loopback_origin(origin: &str) -> bool {
    let rest = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"));
    let Some(rest) = rest else {
        return false;
    };

    let host = match rest.split_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            host
        }
        None => rest,
    };

    host == "localhost" || host == "127.0.0.1"
}

/// Rate-limit key: leftmost x-forwarded-for entry when behind a proxy,
/// else the socket peer address.
fn client_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());
    if let Some(first) = forwarded {
        return first.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_origins_match_any_port() {
        assert!(is_loopback_origin("http://localhost"));
        assert!(is_loopback_origin("http://localhost:5500"));
        assert!(is_loopback_origin("https://127.0.0.1:8443"));
        assert!(!is_loopback_origin("http://localhost.evil.com"));
        assert!(!is_loopback_origin("http://127.0.0.2:80"));
        assert!(!is_loopback_origin("ftp://localhost"));
        assert!(!is_loopback_origin("http://localhost:80x"));
    }

    #[test]
    fn allowlist_is_exact_match() {
        let allow = vec!["https://www.mirasens.com".to_string()];
        assert!(origin_allowed("https://www.mirasens.com", &allow));
        assert!(!origin_allowed("https://www.mirasens.com.evil.com", &allow));
        assert!(!origin_allowed("http://www.mirasens.com", &allow));
    }
}
