//! Derives last-modified time and validator from a freshness source.

use metrics::counter;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, warn};

use super::{
    METRIC_DEGRADED,
    source::{CollectionStats, FreshnessSource, NamedCollection},
    validator::{Validator, collection_input, group_input, record_input},
};

/// Resolved freshness of one response.
///
/// Both fields are `None` when freshness cannot be established; the response
/// is then served without validators and never short-circuits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Freshness {
    /// Whole-second UTC timestamp.
    pub last_modified: Option<OffsetDateTime>,
    pub validator: Option<Validator>,
}

impl Freshness {
    pub fn unknown() -> Self {
        Self::default()
    }

    fn known(last_modified: OffsetDateTime, validator: Validator) -> Self {
        Self {
            last_modified: Some(last_modified),
            validator: Some(validator),
        }
    }

    pub fn is_known(&self) -> bool {
        self.last_modified.is_some()
    }
}

/// Resolve `source` into a [`Freshness`].
///
/// Never fails. A failed count query degrades the tag to type and timestamp
/// only; a failed timestamp query removes that collection's candidate.
pub async fn resolve<C, S>(source: Option<&FreshnessSource<C>>, stats: &S) -> Freshness
where
    C: NamedCollection + Sync,
    S: CollectionStats<C> + ?Sized,
{
    let Some(source) = source else {
        return Freshness::unknown();
    };

    let freshness = match source {
        FreshnessSource::Single(stamp) => {
            let last_modified = truncate_to_second(stamp.updated_at);
            let input = record_input(&stamp.key, last_modified.unix_timestamp());
            Freshness::known(last_modified, Validator::weak(&input))
        }
        FreshnessSource::Collection(collection) => {
            match latest_update(stats, collection).await {
                Some(latest) => {
                    let last_modified = truncate_to_second(latest);
                    let count = member_count(stats, collection).await;
                    let input = collection_input(
                        collection.type_name(),
                        last_modified.unix_timestamp(),
                        count,
                    );
                    Freshness::known(last_modified, Validator::weak(&input))
                }
                None => Freshness::unknown(),
            }
        }
        FreshnessSource::CollectionGroup(members) => resolve_group(members, stats).await,
    };

    debug!(
        target = "storefront::freshness::resolver",
        known = freshness.is_known(),
        validator = freshness.validator.as_ref().map(Validator::as_str),
        "resolved freshness"
    );

    freshness
}

async fn resolve_group<C, S>(members: &[C], stats: &S) -> Freshness
where
    C: NamedCollection + Sync,
    S: CollectionStats<C> + ?Sized,
{
    let mut latest: Option<OffsetDateTime> = None;
    for member in members {
        if let Some(candidate) = latest_update(stats, member).await {
            latest = Some(latest.map_or(candidate, |current| current.max(candidate)));
        }
    }

    let Some(latest) = latest else {
        return Freshness::unknown();
    };
    let last_modified = truncate_to_second(latest);
    let epoch = last_modified.unix_timestamp();

    let mut parts = Vec::with_capacity(members.len());
    for member in members {
        let count = member_count(stats, member).await;
        parts.push(collection_input(member.type_name(), epoch, count));
    }

    Freshness::known(last_modified, Validator::weak(&group_input(parts)))
}

async fn latest_update<C, S>(stats: &S, collection: &C) -> Option<OffsetDateTime>
where
    C: NamedCollection + Sync,
    S: CollectionStats<C> + ?Sized,
{
    match stats.latest_update(collection).await {
        Ok(latest) => latest,
        Err(err) => {
            warn!(
                target = "storefront::freshness::resolver",
                collection = collection.type_name(),
                error = %err,
                "latest update query failed; collection ignored"
            );
            counter!(METRIC_DEGRADED, "query" => "latest_update").increment(1);
            None
        }
    }
}

async fn member_count<C, S>(stats: &S, collection: &C) -> Option<u64>
where
    C: NamedCollection + Sync,
    S: CollectionStats<C> + ?Sized,
{
    match stats.member_count(collection).await {
        Ok(count) => Some(count),
        Err(err) => {
            warn!(
                target = "storefront::freshness::resolver",
                collection = collection.type_name(),
                error = %err,
                "member count query failed; using coarse validator"
            );
            counter!(METRIC_DEGRADED, "query" => "member_count").increment(1);
            None
        }
    }
}

pub(crate) fn truncate_to_second(value: OffsetDateTime) -> OffsetDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    utc.replace_nanosecond(0).unwrap_or(utc)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::macros::datetime;

    use super::*;
    use crate::application::repos::RepoError;
    use crate::freshness::source::RecordStamp;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Table {
        Product,
        Category,
    }

    impl NamedCollection for Table {
        fn type_name(&self) -> &'static str {
            match self {
                Table::Product => "product",
                Table::Category => "category",
            }
        }
    }

    #[derive(Default)]
    struct StubStats {
        rows: Mutex<HashMap<Table, Vec<OffsetDateTime>>>,
        failing_latest: Mutex<Vec<Table>>,
        failing_count: Mutex<Vec<Table>>,
    }

    impl StubStats {
        fn with_rows(self, table: Table, rows: Vec<OffsetDateTime>) -> Self {
            self.rows.lock().unwrap().insert(table, rows);
            self
        }

        fn fail_latest(self, table: Table) -> Self {
            self.failing_latest.lock().unwrap().push(table);
            self
        }

        fn fail_count(self, table: Table) -> Self {
            self.failing_count.lock().unwrap().push(table);
            self
        }

        fn remove_first(&self, table: Table) {
            let mut rows = self.rows.lock().unwrap();
            rows.get_mut(&table).unwrap().remove(0);
        }
    }

    #[async_trait]
    impl CollectionStats<Table> for StubStats {
        async fn latest_update(&self, table: &Table) -> Result<Option<OffsetDateTime>, RepoError> {
            if self.failing_latest.lock().unwrap().contains(table) {
                return Err(RepoError::from_persistence("max query failed"));
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows.get(table).and_then(|rows| rows.iter().max().copied()))
        }

        async fn member_count(&self, table: &Table) -> Result<u64, RepoError> {
            if self.failing_count.lock().unwrap().contains(table) {
                return Err(RepoError::from_persistence("count query failed"));
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows.get(table).map_or(0, |rows| rows.len() as u64))
        }
    }

    const T: OffsetDateTime = datetime!(2024-01-01 00:00:00 UTC);

    fn tag(freshness: &Freshness) -> &str {
        freshness.validator.as_ref().map(Validator::as_str).unwrap()
    }

    #[tokio::test]
    async fn absent_source_is_unknown() {
        let stats = StubStats::default();
        let freshness = resolve::<Table, _>(None, &stats).await;
        assert_eq!(freshness, Freshness::unknown());
    }

    #[tokio::test]
    async fn single_record_uses_key_and_truncated_seconds() {
        let stats = StubStats::default();
        let source = FreshnessSource::<Table>::Single(RecordStamp::new(
            7,
            datetime!(2024-01-01 00:00:00.750 UTC),
        ));

        let first = resolve(Some(&source), &stats).await;
        let second = resolve(Some(&source), &stats).await;

        assert_eq!(first.last_modified, Some(T));
        assert_eq!(tag(&first), "W/\"db7bf027\"");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn single_record_in_other_offset_normalises_to_utc() {
        let stats = StubStats::default();
        let source = FreshnessSource::<Table>::Single(RecordStamp::new(
            7,
            datetime!(2024-01-01 01:00:00 +01:00),
        ));

        let freshness = resolve(Some(&source), &stats).await;
        assert_eq!(freshness.last_modified.map(|t| t.offset()), Some(UtcOffset::UTC));
        assert_eq!(tag(&freshness), "W/\"db7bf027\"");
    }

    #[tokio::test]
    async fn collection_tag_tracks_member_count() {
        let earlier = datetime!(2023-12-01 00:00:00 UTC);
        let stats = StubStats::default().with_rows(
            Table::Product,
            vec![earlier, earlier, earlier, earlier, T],
        );
        let source = FreshnessSource::Collection(Table::Product);

        let five = resolve(Some(&source), &stats).await;
        assert_eq!(five.last_modified, Some(T));
        assert_eq!(tag(&five), "W/\"e9f33142\"");

        // Removing a never-updated member leaves the maximum untouched.
        stats.remove_first(Table::Product);
        let four = resolve(Some(&source), &stats).await;
        assert_eq!(four.last_modified, Some(T));
        assert_eq!(tag(&four), "W/\"9ef401d4\"");
    }

    #[tokio::test]
    async fn empty_collection_is_unknown() {
        let stats = StubStats::default().with_rows(Table::Product, Vec::new());
        let source = FreshnessSource::Collection(Table::Product);

        assert_eq!(resolve(Some(&source), &stats).await, Freshness::unknown());
    }

    #[tokio::test]
    async fn count_failure_degrades_to_coarse_tag() {
        let stats = StubStats::default()
            .with_rows(Table::Product, vec![T])
            .fail_count(Table::Product);
        let source = FreshnessSource::Collection(Table::Product);

        let freshness = resolve(Some(&source), &stats).await;
        assert_eq!(freshness.last_modified, Some(T));
        assert_eq!(tag(&freshness), "W/\"4e89c04d\"");
    }

    #[tokio::test]
    async fn latest_failure_omits_freshness() {
        let stats = StubStats::default()
            .with_rows(Table::Product, vec![T])
            .fail_latest(Table::Product);
        let source = FreshnessSource::Collection(Table::Product);

        assert_eq!(resolve(Some(&source), &stats).await, Freshness::unknown());
    }

    #[tokio::test]
    async fn group_is_order_independent() {
        let stats = StubStats::default()
            .with_rows(Table::Category, vec![T, T, T])
            .with_rows(Table::Product, vec![datetime!(2023-06-01 12:00:00 UTC), T]);

        let forward = FreshnessSource::CollectionGroup(vec![Table::Product, Table::Category]);
        let backward = FreshnessSource::CollectionGroup(vec![Table::Category, Table::Product]);

        let forward = resolve(Some(&forward), &stats).await;
        let backward = resolve(Some(&backward), &stats).await;

        assert_eq!(forward, backward);
        assert_eq!(forward.last_modified, Some(T));
        assert_eq!(tag(&forward), "W/\"e7cf1d29\"");
    }

    #[tokio::test]
    async fn group_uses_latest_member_timestamp() {
        let older = datetime!(2022-05-05 05:05:05 UTC);
        let stats = StubStats::default()
            .with_rows(Table::Category, vec![older])
            .with_rows(Table::Product, vec![T]);
        let source = FreshnessSource::CollectionGroup(vec![Table::Category, Table::Product]);

        let freshness = resolve(Some(&source), &stats).await;
        assert_eq!(freshness.last_modified, Some(T));
    }

    #[tokio::test]
    async fn group_member_count_failure_contributes_coarse_input() {
        let stats = StubStats::default()
            .with_rows(Table::Category, vec![T, T, T])
            .with_rows(Table::Product, vec![T, T])
            .fail_count(Table::Product);
        let source = FreshnessSource::CollectionGroup(vec![Table::Product, Table::Category]);

        let freshness = resolve(Some(&source), &stats).await;
        assert_eq!(tag(&freshness), "W/\"52fdc843\"");
    }

    #[tokio::test]
    async fn group_of_empty_members_is_unknown() {
        let stats = StubStats::default()
            .with_rows(Table::Category, Vec::new())
            .with_rows(Table::Product, Vec::new());
        let source = FreshnessSource::CollectionGroup(vec![Table::Product, Table::Category]);
        assert_eq!(resolve(Some(&source), &stats).await, Freshness::unknown());

        let empty = FreshnessSource::<Table>::CollectionGroup(Vec::new());
        assert_eq!(resolve(Some(&empty), &stats).await, Freshness::unknown());
    }
}
