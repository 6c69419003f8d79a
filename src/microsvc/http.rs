//! HTTP transport - maps HTTP requests to command dispatch.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /:command` - dispatch a command. Body = JSON input, request headers → Session.
//!   Rate limited per client, keyed as [`ClientKey`] says.
//! - `GET /health` - returns `{ "ok": true, "commands": [...] }`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::rate_limit::{ClientKey, RateLimitDecision, RateLimiter};

use super::error::HandlerError;
use super::service::Service;
use super::session::Session;

#[derive(Clone)]
struct Admission {
    limiter: Arc<dyn RateLimiter>,
    client_key: ClientKey,
}

/// Build an axum `Router` that dispatches commands via the given service.
///
/// Peer addresses are read from `ConnectInfo<SocketAddr>`, so serve it with
/// `into_make_service_with_connect_info`.
pub fn router<R: Send + Sync + 'static>(
    service: Arc<Service<R>>,
    limiter: Arc<dyn RateLimiter>,
    client_key: ClientKey,
) -> Router {
    let admission = Admission {
        limiter,
        client_key,
    };
    Router::new()
        .route("/:command", post(command_handler::<R>))
        .route_layer(middleware::from_fn_with_state(admission, rate_limit))
        .route("/health", get(health_handler::<R>))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<R: Send + Sync + 'static>(
    service: Arc<Service<R>>,
    limiter: Arc<dyn RateLimiter>,
    client_key: ClientKey,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service, limiter, client_key);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

async fn health_handler<R: Send + Sync + 'static>(
    State(service): State<Arc<Service<R>>>,
) -> impl IntoResponse {
    let commands: Vec<&str> = service.commands();
    Json(json!({ "ok": true, "commands": commands }))
}

async fn command_handler<R: Send + Sync + 'static>(
    State(service): State<Arc<Service<R>>>,
    Path(command): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            return error_response(&HandlerError::DecodeFailed(rejection.body_text()));
        }
    };
    let session = session_from_headers(&headers);
    match service.dispatch(&command, input, session) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn rate_limit(State(admission): State<Admission>, request: Request, next: Next) -> Response {
    let key = client_key(&request, admission.client_key);
    match admission.limiter.check(&key) {
        RateLimitDecision::Allowed => next.run(request).await,
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(client = %key, retry_after, "rate limited");
            let mut response = error_response(&HandlerError::RateLimited { retry_after });
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

fn error_response(err: &HandlerError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// Peer IP, or the last `x-forwarded-for` hop when a trusted proxy sets it.
fn client_key(request: &Request, keying: ClientKey) -> String {
    if keying == ClientKey::ForwardedFor {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Extract session variables from HTTP headers.
///
/// All headers are lowercased and included as session variables.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = std::collections::HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}
