//! Catch-all reverse proxy handler.
//!
//! Activates the target deployment if it is parked, then forwards the
//! request to the service backend, streaming the response body back to the
//! caller as it arrives.

use crate::api::{ApiError, AppState, MAX_BODY_SIZE};
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, HOST};
use axum::response::Response;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Headers that describe the connection between two hops rather than the
/// end-to-end exchange; never forwarded in either direction.
const HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// ANY /{service} - Proxy a request to the service's backend root.
pub async fn handle_root(
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    forward(state, service, String::new(), request).await
}

/// ANY /{service}/*path - Proxy a request to the service's backend.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Path((service, path)): Path<(String, String)>,
    request: Request,
) -> Result<Response, ApiError> {
    forward(state, service, path, request).await
}

/// Activate, record activity, forward, and stream the response back.
async fn forward(
    state: Arc<AppState>,
    service: String,
    path: String,
    request: Request,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    state.manager.ensure_running(&service).await.map_err(|e| {
        warn!(request_id = %request_id, service = %service, error = %e, "activation failed");
        ApiError::from(e)
    })?;
    state.manager.reset_activity(&service);

    // ensure_running already proved the service is configured
    let config = state
        .config
        .service(&service)
        .ok_or_else(|| ApiError::unknown_service(&service))?;

    let mut url = format!("{}/{}", config.url_base(), path);
    if let Some(query) = request.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|e| ApiError::bad_request(&format!("Failed to read request body: {}", e)))?;

    info!(
        request_id = %request_id,
        service = %service,
        method = %parts.method,
        path = %path,
        "proxying request"
    );

    let mut headers = strip_hop_headers(&parts.headers);
    headers.remove(HOST);
    headers.remove(CONTENT_LENGTH);
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        headers.insert(HeaderName::from_static("x-request-id"), value);
    }

    let backend_response = state
        .http_client
        .request(parts.method, url)
        .headers(headers)
        .body(body_bytes)
        .send()
        .await
        .map_err(|e| {
            warn!(request_id = %request_id, service = %service, error = %e, "upstream connection failed");
            ApiError::upstream_failed(&service, &e.to_string())
        })?;

    // The backend answered: that counts as activity even if the status is an
    // application-level error.
    state.manager.reset_activity(&service);

    let status = backend_response.status();
    let response_headers = strip_hop_headers(backend_response.headers());

    let mut upstream = backend_response.bytes_stream();
    let body_stream = async_stream::stream! {
        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) => yield Ok(bytes),
                Err(e) => {
                    warn!(request_id = %request_id, service = %service, error = %e, "backend stream read error");
                    yield Err(std::io::Error::other(e));
                    break;
                }
            }
        }
    };

    let mut response = Response::new(Body::from_stream(body_stream));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

/// Copy a header map, dropping hop-specific entries.
fn strip_hop_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in HOP_HEADERS {
        out.remove(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_hop_headers_drops_connection_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let out = strip_hop_headers(&headers);
        assert!(!out.contains_key("connection"));
        assert!(!out.contains_key("transfer-encoding"));
        assert_eq!(out.get("content-type").unwrap(), "application/json");
    }
}
