//! Public catalog reads and the freshness sources they are judged by.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::{
    CatalogCollection, CatalogStats, ProductGroupFilter, RepoError, StorefrontRepo,
};
use crate::domain::entities::{
    CategoryRecord, ProductDetail, ProductGroupSlice, ProductImageRecord, ProductOptionRecord,
    StoreAggregate, StoreConfigurationsRecord, StoreCoverRecord, StoreFaqRecord, StoreLogoRecord,
    StoreRecord,
};
use crate::domain::types::LayoutPosition;
use crate::freshness::{Freshness, FreshnessSource, RecordStamp, Versioned, resolve};

/// Featured listing cap, lowest ids first.
pub const FEATURED_LIMIT: i64 = 20;

pub type CatalogSource = FreshnessSource<CatalogCollection>;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("store `{0}` not found")]
    StoreNotFound(String),
    #[error("configurations for store `{0}` not found")]
    ConfigurationsNotFound(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl Versioned for StoreRecord {
    fn stamp(&self) -> RecordStamp {
        RecordStamp::new(self.id, self.updated_at)
    }
}

impl Versioned for StoreConfigurationsRecord {
    fn stamp(&self) -> RecordStamp {
        RecordStamp::new(self.id, self.updated_at)
    }
}

/// Turns stored media paths into absolute URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    base_url: String,
}

impl MediaUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn resolve_opt(&self, path: Option<&str>) -> Option<String> {
        path.filter(|value| !value.is_empty())
            .map(|value| self.resolve(value))
    }
}

#[derive(Clone)]
pub struct StorefrontService {
    repo: Arc<dyn StorefrontRepo>,
    stats: Arc<CatalogStats>,
    media: MediaUrls,
}

impl StorefrontService {
    pub fn new(repo: Arc<dyn StorefrontRepo>, stats: Arc<CatalogStats>, media: MediaUrls) -> Self {
        Self { repo, stats, media }
    }

    pub async fn freshness(&self, source: &CatalogSource) -> Freshness {
        resolve(Some(source), self.stats.as_ref()).await
    }

    pub fn store_products_source(store_name: &str) -> CatalogSource {
        FreshnessSource::Collection(CatalogCollection::StoreProducts {
            store_name: store_name.to_string(),
        })
    }

    pub fn featured_and_categories_source(store_name: &str) -> CatalogSource {
        FreshnessSource::CollectionGroup(vec![
            CatalogCollection::FeaturedProducts {
                store_name: store_name.to_string(),
                limit: FEATURED_LIMIT,
            },
            CatalogCollection::Categories,
        ])
    }

    pub async fn find_store(&self, store_name: &str) -> Result<StoreRecord, StorefrontError> {
        self.repo
            .find_store(store_name)
            .await?
            .ok_or_else(|| StorefrontError::StoreNotFound(store_name.to_string()))
    }

    pub async fn store_detail(&self, store: StoreRecord) -> Result<StoreDetailView, StorefrontError> {
        let aggregate = self.repo.load_store_aggregate(store).await?;
        Ok(StoreDetailView::build(aggregate, &self.media))
    }

    pub async fn find_configurations(
        &self,
        store_name: &str,
    ) -> Result<StoreConfigurationsRecord, StorefrontError> {
        self.repo
            .find_configurations(store_name)
            .await?
            .ok_or_else(|| StorefrontError::ConfigurationsNotFound(store_name.to_string()))
    }

    pub fn configurations_view(&self, record: StoreConfigurationsRecord) -> ConfigurationsView {
        ConfigurationsView::build(record, &self.media)
    }

    pub async fn product_groups(&self, store_name: &str) -> Result<ProductGroupsView, StorefrontError> {
        let total = self
            .repo
            .product_group(store_name, ProductGroupFilter::All)
            .await?;
        let featured = self
            .repo
            .product_group(store_name, ProductGroupFilter::Featured)
            .await?;
        let recent = self
            .repo
            .product_group(store_name, ProductGroupFilter::Recent)
            .await?;

        Ok(ProductGroupsView {
            storename: store_name.to_string(),
            total_products: GroupSummaryView::build(total, &self.media),
            featured_products: GroupSummaryView::build(featured, &self.media),
            recent_products: GroupSummaryView::build(recent, &self.media),
        })
    }

    pub async fn featured_and_categories(
        &self,
        store_name: &str,
    ) -> Result<FeaturedAndCategoriesView, StorefrontError> {
        let featured = self
            .repo
            .list_featured_products(store_name, FEATURED_LIMIT)
            .await?;
        let categories = self.repo.list_categories().await?;

        Ok(FeaturedAndCategoriesView {
            featured_products: featured
                .into_iter()
                .map(|detail| FeaturedProductView::build(detail, &self.media))
                .collect(),
            categories: categories
                .into_iter()
                .map(|category| CategoryView::build(category, &self.media))
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqView {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

impl From<StoreFaqRecord> for FaqView {
    fn from(record: StoreFaqRecord) -> Self {
        Self {
            id: record.id,
            question: record.question,
            answer: record.answer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationsView {
    pub id: i64,
    pub background_image_one: Option<String>,
    pub background_image_two: Option<String>,
    pub background_image_three: Option<String>,
    pub brand_color_light: String,
    pub brand_color_dark: String,
    pub headline: Option<String>,
    pub subheading: Option<String>,
    pub more_button: Option<String>,
    pub about_button: Option<String>,
    pub position: LayoutPosition,
    pub latest_first: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ConfigurationsView {
    fn build(record: StoreConfigurationsRecord, media: &MediaUrls) -> Self {
        Self {
            id: record.id,
            background_image_one: media.resolve_opt(record.background_image_one.as_deref()),
            background_image_two: media.resolve_opt(record.background_image_two.as_deref()),
            background_image_three: media.resolve_opt(record.background_image_three.as_deref()),
            brand_color_light: record.brand_color_light,
            brand_color_dark: record.brand_color_dark,
            headline: record.headline,
            subheading: record.subheading,
            more_button: record.more_button,
            about_button: record.about_button,
            position: record.position,
            latest_first: record.latest_first,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoView {
    pub id: i64,
    pub logo: Option<String>,
}

impl LogoView {
    fn build(record: StoreLogoRecord, media: &MediaUrls) -> Self {
        Self {
            id: record.id,
            logo: media.resolve_opt(record.logo.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverView {
    pub id: i64,
    pub cover_image: Option<String>,
}

impl CoverView {
    fn build(record: StoreCoverRecord, media: &MediaUrls) -> Self {
        Self {
            id: record.id,
            cover_image: media.resolve_opt(record.cover_image.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreDetailView {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub delivery: Option<String>,
    pub business_category: Option<String>,
    pub product_types: Vec<String>,
    pub story: Option<String>,
    pub image_one: Option<String>,
    pub image_two: Option<String>,
    pub image_three: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub tiktok: Option<String>,
    pub snapchat: Option<String>,
    pub instagram: Option<String>,
    pub delivery_time: Option<String>,
    pub policy: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub faqs: Vec<FaqView>,
    pub configurations: Option<ConfigurationsView>,
    pub logo: Option<LogoView>,
    pub cover: Option<CoverView>,
}

impl StoreDetailView {
    fn build(aggregate: StoreAggregate, media: &MediaUrls) -> Self {
        let StoreAggregate {
            store,
            faqs,
            configurations,
            logo,
            cover,
        } = aggregate;

        Self {
            id: store.id,
            name: store.name,
            phone: store.phone,
            description: store.description,
            country: store.country,
            state: store.state,
            address: store.address,
            delivery: store.delivery,
            business_category: store.business_category,
            product_types: store.product_types,
            story: store.story,
            image_one: media.resolve_opt(store.image_one.as_deref()),
            image_two: media.resolve_opt(store.image_two.as_deref()),
            image_three: media.resolve_opt(store.image_three.as_deref()),
            twitter: store.twitter,
            facebook: store.facebook,
            tiktok: store.tiktok,
            snapchat: store.snapchat,
            instagram: store.instagram,
            delivery_time: store.delivery_time,
            policy: store.policy,
            created_at: store.created_at,
            updated_at: store.updated_at,
            faqs: faqs.into_iter().map(FaqView::from).collect(),
            configurations: configurations.map(|record| ConfigurationsView::build(record, media)),
            logo: logo.map(|record| LogoView::build(record, media)),
            cover: cover.map(|record| CoverView::build(record, media)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummaryView {
    pub count: u64,
    pub image: Option<String>,
}

impl GroupSummaryView {
    fn build(slice: ProductGroupSlice, media: &MediaUrls) -> Self {
        Self {
            count: slice.count,
            image: media.resolve_opt(slice.primary_image.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGroupsView {
    pub storename: String,
    pub total_products: GroupSummaryView,
    pub featured_products: GroupSummaryView,
    pub recent_products: GroupSummaryView,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub slug: String,
}

impl CategoryView {
    fn build(record: CategoryRecord, media: &MediaUrls) -> Self {
        Self {
            id: record.id,
            name: record.name,
            image: media.resolve_opt(record.image.as_deref()),
            slug: record.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub id: i64,
    pub image: String,
    pub is_thumbnail: bool,
}

impl ImageView {
    fn build(record: ProductImageRecord, media: &MediaUrls) -> Self {
        Self {
            id: record.id,
            image: media.resolve(&record.image),
            is_thumbnail: record.is_thumbnail,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub id: i64,
    pub note: Option<String>,
    pub options: Vec<String>,
    pub as_template: bool,
    pub template_name: Option<String>,
}

impl From<ProductOptionRecord> for OptionView {
    fn from(record: ProductOptionRecord) -> Self {
        Self {
            id: record.id,
            note: record.note,
            options: record.options,
            as_template: record.as_template,
            template_name: record.template_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedProductView {
    pub id: i64,
    pub name: String,
    pub category: Option<CategoryView>,
    pub description: String,
    pub price: String,
    pub discount_price: Option<String>,
    pub quantity: i32,
    pub availability: bool,
    pub hot_deal: bool,
    pub featured: bool,
    pub recent: bool,
    pub extra_info: String,
    pub images: Vec<ImageView>,
    pub options: Vec<OptionView>,
}

impl FeaturedProductView {
    fn build(detail: ProductDetail, media: &MediaUrls) -> Self {
        let ProductDetail {
            product,
            category,
            images,
            options,
        } = detail;

        Self {
            id: product.id,
            name: product.name,
            category: category.map(|record| CategoryView::build(record, media)),
            description: product.description,
            price: product.price,
            discount_price: product.discount_price,
            quantity: product.quantity,
            availability: product.availability,
            hot_deal: product.hot_deal,
            featured: product.featured,
            recent: product.recent,
            extra_info: product.extra_info,
            images: images
                .into_iter()
                .map(|record| ImageView::build(record, media))
                .collect(),
            options: options.into_iter().map(OptionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedAndCategoriesView {
    pub featured_products: Vec<FeaturedProductView>,
    pub categories: Vec<CategoryView>,
}

/// Thumbnail first, otherwise the earliest image.
pub fn primary_image(images: &[ProductImageRecord]) -> Option<&ProductImageRecord> {
    images
        .iter()
        .find(|image| image.is_thumbnail)
        .or_else(|| images.iter().min_by_key(|image| image.id))
}
