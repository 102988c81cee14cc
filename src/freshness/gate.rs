//! Conditional request evaluation.

use axum::http::{HeaderMap, header};
use metrics::counter;
use time::OffsetDateTime;
use tracing::debug;

use super::{METRIC_NOT_MODIFIED, METRIC_PROCEED, http_date, resolver::Freshness, validator::Validator};

/// Client-supplied revalidation headers. Unusable values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalRequest {
    /// Trimmed entity tags from every `If-None-Match` line; `*` kept verbatim.
    pub if_none_match: Option<Vec<String>>,
    pub if_modified_since: Option<OffsetDateTime>,
}

impl ConditionalRequest {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let tags: Vec<String> = headers
            .get_all(header::IF_NONE_MATCH)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect();

        let if_modified_since = headers
            .get(header::IF_MODIFIED_SINCE)
            .and_then(|value| value.to_str().ok())
            .and_then(http_date::parse);

        Self {
            if_none_match: (!tags.is_empty()).then_some(tags),
            if_modified_since,
        }
    }

    pub fn is_conditional(&self) -> bool {
        self.if_none_match.is_some() || self.if_modified_since.is_some()
    }

    fn matches_tag(&self, validator: &Validator) -> bool {
        self.if_none_match.as_ref().is_some_and(|tags| {
            tags.iter()
                .any(|tag| tag == "*" || tag == validator.as_str())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevalidationOutcome {
    NotModified {
        validator: Option<Validator>,
        last_modified: Option<OffsetDateTime>,
    },
    Proceed,
}

impl RevalidationOutcome {
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified { .. })
    }
}

/// Decide whether the client copy is current.
///
/// A matching tag list wins outright; otherwise `If-Modified-Since` is
/// compared against the whole-second last-modified time.
pub fn decide(request: &ConditionalRequest, freshness: &Freshness) -> RevalidationOutcome {
    let outcome = evaluate(request, freshness);

    if request.is_conditional() {
        debug!(
            target = "storefront::freshness::gate",
            not_modified = outcome.is_not_modified(),
            "evaluated conditional request"
        );
        if outcome.is_not_modified() {
            counter!(METRIC_NOT_MODIFIED).increment(1);
        } else {
            counter!(METRIC_PROCEED).increment(1);
        }
    }

    outcome
}

fn evaluate(request: &ConditionalRequest, freshness: &Freshness) -> RevalidationOutcome {
    if let Some(validator) = &freshness.validator
        && request.matches_tag(validator)
    {
        return not_modified(freshness);
    }

    if let (Some(client), Some(server)) = (request.if_modified_since, freshness.last_modified)
        && client >= server
    {
        return not_modified(freshness);
    }

    RevalidationOutcome::Proceed
}

fn not_modified(freshness: &Freshness) -> RevalidationOutcome {
    RevalidationOutcome::NotModified {
        validator: freshness.validator.clone(),
        last_modified: freshness.last_modified,
    }
}
