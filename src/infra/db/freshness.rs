//! Aggregate queries backing collection freshness.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::application::repos::{CatalogCollection, RepoError};
use crate::freshness::CollectionStats;

use super::{PostgresRepositories, map_sqlx_error};

/// Push a subquery yielding the collection's rows with an `updated_at` column.
fn push_collection<'q>(qb: &mut QueryBuilder<'q, Postgres>, collection: &'q CatalogCollection) {
    match collection {
        CatalogCollection::StoreProducts { store_name } => {
            qb.push(
                "SELECT p.updated_at FROM products p \
                 INNER JOIN vendors v ON v.id = p.vendor_id \
                 WHERE LOWER(v.store_name) = LOWER(",
            );
            qb.push_bind(store_name.as_str());
            qb.push(")");
        }
        CatalogCollection::FeaturedProducts { store_name, limit } => {
            qb.push(
                "SELECT p.updated_at FROM products p \
                 INNER JOIN vendors v ON v.id = p.vendor_id \
                 WHERE p.featured AND LOWER(v.store_name) = LOWER(",
            );
            qb.push_bind(store_name.as_str());
            qb.push(") ORDER BY p.id LIMIT ");
            qb.push_bind(*limit);
        }
        CatalogCollection::Categories => {
            qb.push("SELECT c.updated_at FROM categories c");
        }
    }
}

#[async_trait]
impl CollectionStats<CatalogCollection> for PostgresRepositories {
    async fn latest_update(
        &self,
        collection: &CatalogCollection,
    ) -> Result<Option<OffsetDateTime>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT MAX(members.updated_at) FROM (");
        push_collection(&mut qb, collection);
        qb.push(") AS members");

        qb.build_query_scalar::<Option<OffsetDateTime>>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn member_count(&self, collection: &CatalogCollection) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM (");
        push_collection(&mut qb, collection);
        qb.push(") AS members");

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }
}
