//! Response-side half of revalidation: 304 construction and header stamping.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use super::{
    gate::{ConditionalRequest, RevalidationOutcome, decide},
    http_date,
    resolver::Freshness,
    validator::Validator,
};

/// Zero freshness lifetime; every reuse goes back to origin.
pub const CACHE_CONTROL_POLICY: &str = "public, max-age=0, must-revalidate";

/// Cache behaviour declared by a group of endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    enabled: bool,
    vary: Vec<HeaderName>,
}

impl CachePolicy {
    pub fn new(enabled: bool, vary: Vec<HeaderName>) -> Self {
        Self { enabled, vary }
    }

    /// Never short-circuits and never stamps headers.
    pub fn disabled() -> Self {
        Self::new(false, Vec::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn vary(&self) -> &[HeaderName] {
        &self.vary
    }

    fn vary_value(&self) -> Option<HeaderValue> {
        if self.vary.is_empty() {
            return None;
        }
        let joined = self
            .vary
            .iter()
            .map(HeaderName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        HeaderValue::from_str(&joined).ok()
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(true, Vec::new())
    }
}

/// Freshness registered by an endpoint for the current request.
///
/// Handlers call [`Revalidation::check`] before building a payload and
/// [`Revalidation::attach`] on the response they return; the
/// [`finalize_responses`] middleware then stamps the headers.
#[derive(Debug, Clone)]
pub struct Revalidation {
    freshness: Freshness,
    policy: CachePolicy,
}

impl Revalidation {
    pub fn new(freshness: Freshness, policy: CachePolicy) -> Self {
        Self { freshness, policy }
    }

    pub fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    /// A ready 304 when the client copy is current, `None` to proceed.
    pub fn check(&self, method: &Method, headers: &HeaderMap) -> Option<Response> {
        if !self.policy.enabled || !is_safe_read(method) {
            return None;
        }

        let request = ConditionalRequest::from_headers(headers);
        match decide(&request, &self.freshness) {
            RevalidationOutcome::NotModified {
                validator,
                last_modified,
            } => Some(not_modified_response(
                validator.as_ref(),
                last_modified,
                &self.policy,
            )),
            RevalidationOutcome::Proceed => None,
        }
    }

    /// Register this stamp on `response` for the finalizer.
    pub fn attach(self, response: &mut Response) {
        if self.policy.enabled {
            response.extensions_mut().insert(self);
        }
    }

    fn apply(&self, headers: &mut HeaderMap) {
        insert_validators(
            headers,
            self.freshness.validator.as_ref(),
            self.freshness.last_modified,
        );
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_POLICY),
        );
        if let Some(vary) = self.policy.vary_value() {
            headers.insert(header::VARY, vary);
        }
    }
}

/// GET and HEAD.
pub fn is_safe_read(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// Empty 304 carrying the current validators.
pub fn not_modified_response(
    validator: Option<&Validator>,
    last_modified: Option<OffsetDateTime>,
    policy: &CachePolicy,
) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    insert_validators(headers, validator, last_modified);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_POLICY),
    );
    if let Some(vary) = policy.vary_value() {
        headers.insert(header::VARY, vary);
    }
    response
}

fn insert_validators(
    headers: &mut HeaderMap,
    validator: Option<&Validator>,
    last_modified: Option<OffsetDateTime>,
) {
    if let Some(etag) = validator.and_then(Validator::to_header_value) {
        headers.insert(header::ETAG, etag);
    }
    if let Some(value) = last_modified
        .and_then(http_date::format)
        .and_then(|formatted| HeaderValue::from_str(&formatted).ok())
    {
        headers.insert(header::LAST_MODIFIED, value);
    }
}

/// Stamp freshness headers on successful safe reads that registered a
/// [`Revalidation`]. Everything else passes through untouched.
pub async fn finalize_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let mut response = next.run(request).await;

    let Some(stamp) = response.extensions_mut().remove::<Revalidation>() else {
        return response;
    };

    if is_safe_read(&method) && response.status().is_success() {
        stamp.apply(response.headers_mut());
    }

    response
}
