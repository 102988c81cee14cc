//! What a response's freshness is derived from.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::RepoError;

/// Identity and modification time of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStamp {
    pub key: String,
    pub updated_at: OffsetDateTime,
}

impl RecordStamp {
    pub fn new(key: impl ToString, updated_at: OffsetDateTime) -> Self {
        Self {
            key: key.to_string(),
            updated_at,
        }
    }
}

/// A record that can stand alone as a freshness source.
pub trait Versioned {
    fn stamp(&self) -> RecordStamp;
}

/// A filtered set of same-typed records.
pub trait NamedCollection {
    /// Lowercase record type name, e.g. `product`.
    fn type_name(&self) -> &'static str;
}

/// Aggregate queries over a collection.
///
/// Both calls must describe the same filtered set.
#[async_trait]
pub trait CollectionStats<C>: Send + Sync
where
    C: NamedCollection + Sync,
{
    /// Most recent `updated_at` across the set; `None` when the set is empty.
    async fn latest_update(&self, collection: &C) -> Result<Option<OffsetDateTime>, RepoError>;

    async fn member_count(&self, collection: &C) -> Result<u64, RepoError>;
}

/// The records whose modification time governs one response.
///
/// Built per request from live state and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreshnessSource<C> {
    Single(RecordStamp),
    Collection(C),
    /// Heterogeneous collections judged together; listing order is irrelevant.
    CollectionGroup(Vec<C>),
}

impl<C> FreshnessSource<C> {
    pub fn single<V: Versioned + ?Sized>(record: &V) -> Self {
        Self::Single(record.stamp())
    }

    /// True when resolving cannot yield a timestamp without touching storage.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::CollectionGroup(members) if members.is_empty())
    }
}
