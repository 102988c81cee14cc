//! HTTP revalidation for public catalog reads.
//!
//! A read endpoint names the records its payload is built from (a
//! [`FreshnessSource`]), resolves them into a [`Freshness`] (last-modified
//! time plus weak validator), asks the gate whether the client copy is still
//! current, and finally stamps the validator headers on the 200 response:
//!
//! ```text
//! FreshnessSource --resolve--> Freshness --decide--> NotModified | Proceed
//!                                   \
//!                                    `--Revalidation::attach--> finalize_responses
//! ```
//!
//! The layer is best-effort. Query failures degrade the validator or drop the
//! headers; nothing here turns a successful response into an error.

pub mod finalize;
pub mod gate;
pub mod http_date;
pub mod resolver;
pub mod source;
pub mod validator;

pub use finalize::{
    CACHE_CONTROL_POLICY, CachePolicy, Revalidation, finalize_responses, is_safe_read,
    not_modified_response,
};
pub use gate::{ConditionalRequest, RevalidationOutcome, decide};
pub use resolver::{Freshness, resolve};
pub use source::{CollectionStats, FreshnessSource, NamedCollection, RecordStamp, Versioned};
pub use validator::Validator;

pub(crate) const METRIC_NOT_MODIFIED: &str = "storefront_freshness_not_modified_total";
pub(crate) const METRIC_PROCEED: &str = "storefront_freshness_proceed_total";
pub(crate) const METRIC_DEGRADED: &str = "storefront_freshness_degraded_total";
