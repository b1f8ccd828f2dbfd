//! Dual-path forwarding proxy for the GigaChat upstreams.
//!
//! Exposes two independently targeted forwarding paths:
//!
//! | Inbound prefix | Upstream | Injected headers |
//! |---|---|---|
//! | `/auth-proxy` | token-issuance host | `RqUID` (fresh per request), recomputed `Content-Length` |
//! | `/api-proxy`  | models/completions host | `Accept: application/json` |
//!
//! Each request has its prefix stripped and the remainder of the path (plus
//! any query string) appended to the configured upstream base. The method,
//! body, and non-hop-by-hop request headers (notably `Authorization`) pass
//! through untouched. The upstream's status, content type, and body are
//! relayed back verbatim.
//!
//! The client library never talks to the real hosts; it only knows these
//! two prefixes. That keeps upstream origins, TLS quirks, and correlation
//! bookkeeping out of the client entirely.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use log::{debug, warn};
use uuid::Uuid;

/// Correlation identifier header injected on the auth path.
const RQUID_HEADER: &str = "RqUID";

/// Request headers that must not be forwarded to the upstream.
///
/// Hop-by-hop headers plus `host` (the upstream has its own) and
/// `content-length` (recomputed from the forwarded body).
const SKIPPED_HEADERS: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// Which forwarding path a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForwardPath {
    Auth,
    Api,
}

/// Shared proxy state: one outbound HTTP client and the two upstream bases.
#[derive(Debug, Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    auth_upstream: String,
    api_upstream: String,
}

impl ProxyState {
    /// Creates the proxy state.
    ///
    /// `insecure` disables upstream certificate verification, needed when
    /// the auth upstream presents a certificate chain the local trust
    /// store does not carry.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the HTTP client cannot be built.
    pub fn new(
        auth_upstream: impl Into<String>,
        api_upstream: impl Into<String>,
        insecure: bool,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self {
            http,
            auth_upstream: trim_base(auth_upstream),
            api_upstream: trim_base(api_upstream),
        })
    }
}

fn trim_base(base: impl Into<String>) -> String {
    let base = base.into();
    base.trim_end_matches('/').to_string()
}

/// Builds the forwarding router over the given state.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/auth-proxy/{*rest}", any(forward_auth))
        .route("/api-proxy/{*rest}", any(forward_api))
        .with_state(state)
}

async fn forward_auth(
    State(state): State<ProxyState>,
    Path(rest): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(&state, ForwardPath::Auth, &rest, query, method, headers, body).await
}

async fn forward_api(
    State(state): State<ProxyState>,
    Path(rest): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(&state, ForwardPath::Api, &rest, query, method, headers, body).await
}

/// Strips the prefix, rewrites the target, injects the per-path headers,
/// and relays the upstream response.
async fn forward(
    state: &ProxyState,
    path: ForwardPath,
    rest: &str,
    query: Option<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let upstream = match path {
        ForwardPath::Auth => &state.auth_upstream,
        ForwardPath::Api => &state.api_upstream,
    };
    let mut url = format!("{upstream}/{rest}");
    if let Some(query) = query {
        url.push('?');
        url.push_str(&query);
    }
    debug!("forwarding {method} /{rest} -> {url}");

    let mut forwarded = HeaderMap::new();
    for (name, value) in &headers {
        if SKIPPED_HEADERS.contains(&name.as_str()) {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    match path {
        // A fresh correlation id per request, replacing any inbound one.
        ForwardPath::Auth => {
            if let Ok(rquid) = header::HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                forwarded.insert(RQUID_HEADER, rquid);
            }
        }
        ForwardPath::Api => {
            forwarded.insert(
                header::ACCEPT,
                header::HeaderValue::from_static("application/json"),
            );
        }
    }

    let request = state.http.request(method, &url).headers(forwarded).body(body);
    let upstream_response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("upstream request to {url} failed: {err}");
            return (StatusCode::BAD_GATEWAY, format!("upstream unreachable: {err}"))
                .into_response();
        }
    };

    relay(upstream_response).await
}

/// Relays the upstream status, content type, and body back to the client.
async fn relay(response: reqwest::Response) -> Response {
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned();

    let body = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("failed to read upstream response body: {err}");
            return (StatusCode::BAD_GATEWAY, format!("upstream body error: {err}"))
                .into_response();
        }
    };

    let mut relayed = (status, body).into_response();
    if let Some(content_type) = content_type {
        relayed
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    relayed
}
