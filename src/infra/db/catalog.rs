//! Public storefront reads.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;

use crate::application::repos::{ProductGroupFilter, RepoError, StorefrontRepo};
use crate::application::storefront::primary_image;
use crate::domain::entities::{
    CategoryRecord, ProductDetail, ProductGroupSlice, ProductImageRecord, ProductOptionRecord,
    ProductRecord, StoreAggregate, StoreConfigurationsRecord, StoreCoverRecord, StoreFaqRecord,
    StoreLogoRecord, StoreRecord,
};

use super::{
    PostgresRepositories, map_sqlx_error,
    stores::{
        CONFIGURATIONS_COLUMNS, ConfigurationsRow, CoverRow, FAQ_COLUMNS, FaqRow, LogoRow,
        STORE_COLUMNS, StoreRow, VENDOR_NAME_MATCH,
    },
};

const PRODUCT_COLUMNS: &str = "p.id, p.vendor_id, p.name, p.category_id, \
    p.description, p.price::text AS price, p.discount_price::text AS discount_price, p.quantity, \
    p.availability, p.hot_deal, p.featured, p.recent, p.extra_info, p.created_at, p.updated_at";

const CATEGORY_COLUMNS: &str = "id, name, image, slug, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    image: Option<String>,
    slug: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image: row.image,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    vendor_id: i64,
    name: String,
    category_id: Option<i64>,
    description: String,
    price: String,
    discount_price: Option<String>,
    quantity: i32,
    availability: bool,
    hot_deal: bool,
    featured: bool,
    recent: bool,
    extra_info: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            vendor_id: row.vendor_id,
            name: row.name,
            category_id: row.category_id,
            description: row.description,
            price: row.price,
            discount_price: row.discount_price,
            quantity: row.quantity,
            availability: row.availability,
            hot_deal: row.hot_deal,
            featured: row.featured,
            recent: row.recent,
            extra_info: row.extra_info,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: i64,
    product_id: i64,
    image: String,
    is_thumbnail: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ImageRow> for ProductImageRecord {
    fn from(row: ImageRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            image: row.image,
            is_thumbnail: row.is_thumbnail,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OptionRow {
    id: i64,
    product_id: i64,
    note: Option<String>,
    options: Json<Vec<String>>,
    as_template: bool,
    template_name: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<OptionRow> for ProductOptionRecord {
    fn from(row: OptionRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            note: row.note,
            options: row.options.0,
            as_template: row.as_template,
            template_name: row.template_name,
            updated_at: row.updated_at,
        }
    }
}

fn product_filter_clause(filter: ProductGroupFilter) -> &'static str {
    match filter {
        ProductGroupFilter::All => "",
        ProductGroupFilter::Featured => " AND p.featured",
        ProductGroupFilter::Recent => " AND p.recent",
    }
}

impl PostgresRepositories {
    async fn images_for(&self, product_ids: &[i64]) -> Result<Vec<ProductImageRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ImageRow>(
            "SELECT id, product_id, image, is_thumbnail, created_at, updated_at \
             FROM product_images \
             WHERE product_id = ANY($1) \
             ORDER BY product_id, id",
        )
        .bind(product_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductImageRecord::from).collect())
    }
}

#[async_trait]
impl StorefrontRepo for PostgresRepositories {
    async fn find_store(&self, store_name: &str) -> Result<Option<StoreRecord>, RepoError> {
        let sql = format!(
            "SELECT {STORE_COLUMNS} FROM stores s \
             INNER JOIN vendors v ON v.id = s.vendor_id \
             WHERE {VENDOR_NAME_MATCH}"
        );
        let row = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(store_name)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(StoreRecord::from))
    }

    async fn load_store_aggregate(&self, store: StoreRecord) -> Result<StoreAggregate, RepoError> {
        let faq_sql = format!("SELECT {FAQ_COLUMNS} FROM store_faqs f WHERE f.store_id = $1 ORDER BY f.id");
        let faqs = sqlx::query_as::<_, FaqRow>(&faq_sql)
            .bind(store.id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let configurations_sql = format!(
            "SELECT {CONFIGURATIONS_COLUMNS} FROM store_configurations c WHERE c.vendor_id = $1"
        );
        let configurations = sqlx::query_as::<_, ConfigurationsRow>(&configurations_sql)
            .bind(store.vendor_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let logo = sqlx::query_as::<_, LogoRow>(
            "SELECT id, vendor_id, logo, updated_at FROM store_logos WHERE vendor_id = $1",
        )
        .bind(store.vendor_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let cover = sqlx::query_as::<_, CoverRow>(
            "SELECT id, vendor_id, cover_image, updated_at FROM store_covers WHERE vendor_id = $1",
        )
        .bind(store.vendor_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(StoreAggregate {
            store,
            faqs: faqs.into_iter().map(StoreFaqRecord::from).collect(),
            configurations: configurations.map(StoreConfigurationsRecord::from),
            logo: logo.map(StoreLogoRecord::from),
            cover: cover.map(StoreCoverRecord::from),
        })
    }

    async fn find_configurations(
        &self,
        store_name: &str,
    ) -> Result<Option<StoreConfigurationsRecord>, RepoError> {
        let sql = format!(
            "SELECT {CONFIGURATIONS_COLUMNS} FROM store_configurations c \
             INNER JOIN vendors v ON v.id = c.vendor_id \
             WHERE {VENDOR_NAME_MATCH}"
        );
        let row = sqlx::query_as::<_, ConfigurationsRow>(&sql)
            .bind(store_name)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(StoreConfigurationsRecord::from))
    }

    async fn product_group(
        &self,
        store_name: &str,
        filter: ProductGroupFilter,
    ) -> Result<ProductGroupSlice, RepoError> {
        let sql = format!(
            "SELECT COUNT(*) AS count, MIN(p.id) AS first_id FROM products p \
             INNER JOIN vendors v ON v.id = p.vendor_id \
             WHERE {VENDOR_NAME_MATCH}{}",
            product_filter_clause(filter)
        );
        let (count, first_id): (i64, Option<i64>) = sqlx::query_as(&sql)
            .bind(store_name)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let primary_image = match first_id {
            Some(product_id) => {
                let images = self.images_for(&[product_id]).await?;
                primary_image(&images).map(|image| image.image.clone())
            }
            None => None,
        };

        Ok(ProductGroupSlice {
            count: Self::convert_count(count)?,
            primary_image,
        })
    }

    async fn list_featured_products(
        &self,
        store_name: &str,
        limit: i64,
    ) -> Result<Vec<ProductDetail>, RepoError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             INNER JOIN vendors v ON v.id = p.vendor_id \
             WHERE {VENDOR_NAME_MATCH} AND p.featured \
             ORDER BY p.id \
             LIMIT $2"
        );
        let products: Vec<ProductRecord> = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(store_name)
            .bind(limit)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(ProductRecord::from)
            .collect();

        if products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i64> = products.iter().map(|product| product.id).collect();
        let category_ids: Vec<i64> = products
            .iter()
            .filter_map(|product| product.category_id)
            .collect();

        let category_sql =
            format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ANY($1)");
        let categories: HashMap<i64, CategoryRecord> =
            sqlx::query_as::<_, CategoryRow>(&category_sql)
                .bind(&category_ids)
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?
                .into_iter()
                .map(|row| (row.id, CategoryRecord::from(row)))
                .collect();

        let mut images: HashMap<i64, Vec<ProductImageRecord>> = HashMap::new();
        for image in self.images_for(&product_ids).await? {
            images.entry(image.product_id).or_default().push(image);
        }

        let option_rows = sqlx::query_as::<_, OptionRow>(
            "SELECT o.id, o.product_id, n.note, o.options, o.as_template, o.template_name, \
                    o.updated_at \
             FROM product_options o \
             LEFT JOIN options_notes n ON n.id = o.note_id \
             WHERE o.product_id = ANY($1) \
             ORDER BY o.product_id, o.id",
        )
        .bind(&product_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut options: HashMap<i64, Vec<ProductOptionRecord>> = HashMap::new();
        for row in option_rows {
            let record = ProductOptionRecord::from(row);
            options.entry(record.product_id).or_default().push(record);
        }

        Ok(products
            .into_iter()
            .map(|product| ProductDetail {
                category: product
                    .category_id
                    .and_then(|id| categories.get(&id).cloned()),
                images: images.remove(&product.id).unwrap_or_default(),
                options: options.remove(&product.id).unwrap_or_default(),
                product,
            })
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id");
        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }
}
