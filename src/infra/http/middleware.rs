use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

/// Path prefixes whose next segment names the store being served.
const STORE_SCOPED_PREFIXES: &[&str] = &[
    "stores",
    "configurations",
    "item-group",
    "featured-and-category",
];

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
    /// Store named by the request path, lowercased; `None` for unscoped routes.
    pub store_name: Option<String>,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let ctx = RequestContext {
        request_id: request_id.clone(),
        store_name: store_scope(request.uri().path()),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

pub(crate) fn store_scope(path: &str) -> Option<String> {
    let mut segments = path.trim_start_matches('/').split('/');
    let prefix = segments.next()?;
    if !STORE_SCOPED_PREFIXES.contains(&prefix) {
        return None;
    }
    segments
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_ascii_lowercase)
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let (request_id, store_name) = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| (ctx.request_id.clone(), ctx.store_name.clone()))
        .unwrap_or_default();
    let store_name = store_name.unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();

    if status == StatusCode::NOT_MODIFIED {
        let etag = response
            .headers()
            .get(header::ETAG)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        debug!(
            target = "storefront::http::response",
            method = %method,
            path = %uri.path(),
            store_name = %store_name,
            etag = etag,
            elapsed_ms = start.elapsed().as_millis(),
            request_id = request_id,
            "served not modified",
        );
        return response;
    }

    if status.is_client_error() || status.is_server_error() {
        let elapsed_ms = start.elapsed().as_millis();
        let report = response.extensions_mut().remove::<ErrorReport>();
        let (source, messages) = match report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let detail = messages
            .first()
            .cloned()
            .unwrap_or_else(|| "no diagnostic available".to_string());

        if status.is_server_error() {
            error!(
                target = "storefront::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                store_name = %store_name,
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                chain = ?messages,
                request_id = request_id,
                "request failed",
            );
        } else {
            warn!(
                target = "storefront::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                store_name = %store_name,
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                chain = ?messages,
                request_id = request_id,
                "client request error",
            );
        }
    }

    response
}
