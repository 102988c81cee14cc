//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    CategoryRecord, ProductDetail, ProductGroupSlice, StoreAggregate, StoreConfigurationsRecord,
    StoreFaqRecord, StoreRecord, VendorRecord,
};
use crate::domain::types::LayoutPosition;
use crate::freshness::{CollectionStats, NamedCollection};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Catalog row sets that public reads derive freshness from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCollection {
    /// Every product owned by the store.
    StoreProducts { store_name: String },
    /// The first `limit` featured products of the store, by id.
    FeaturedProducts { store_name: String, limit: i64 },
    /// The global category list.
    Categories,
}

impl NamedCollection for CatalogCollection {
    fn type_name(&self) -> &'static str {
        match self {
            CatalogCollection::StoreProducts { .. } | CatalogCollection::FeaturedProducts { .. } => {
                "product"
            }
            CatalogCollection::Categories => "category",
        }
    }
}

/// Freshness statistics over catalog collections.
pub type CatalogStats = dyn CollectionStats<CatalogCollection>;

/// Product subsets summarised by the item-group endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductGroupFilter {
    All,
    Featured,
    Recent,
}

#[async_trait]
pub trait StorefrontRepo: Send + Sync {
    /// Case-insensitive lookup on the owning vendor's store name.
    async fn find_store(&self, store_name: &str) -> Result<Option<StoreRecord>, RepoError>;

    async fn load_store_aggregate(&self, store: StoreRecord) -> Result<StoreAggregate, RepoError>;

    async fn find_configurations(
        &self,
        store_name: &str,
    ) -> Result<Option<StoreConfigurationsRecord>, RepoError>;

    /// Count of the subset plus the primary image of its lowest-id product.
    async fn product_group(
        &self,
        store_name: &str,
        filter: ProductGroupFilter,
    ) -> Result<ProductGroupSlice, RepoError>;

    async fn list_featured_products(
        &self,
        store_name: &str,
        limit: i64,
    ) -> Result<Vec<ProductDetail>, RepoError>;

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewVendorParams {
    pub email: String,
    pub store_name: String,
    pub full_name: Option<String>,
}

/// Partial store profile update; `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateStoreParams {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub delivery: Option<String>,
    pub business_category: Option<String>,
    pub product_types: Option<Vec<String>>,
    pub story: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub tiktok: Option<String>,
    pub snapchat: Option<String>,
    pub instagram: Option<String>,
    pub delivery_time: Option<String>,
    pub policy: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateFaqParams {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFaqParams {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateConfigurationsParams {
    pub brand_color_light: Option<String>,
    pub brand_color_dark: Option<String>,
    pub headline: Option<String>,
    pub subheading: Option<String>,
    pub more_button: Option<String>,
    pub about_button: Option<String>,
    pub position: Option<LayoutPosition>,
    pub latest_first: Option<bool>,
}

/// Vendor-facing writes. Every call addresses the store by name and reports
/// [`RepoError::NotFound`] when it does not exist.
#[async_trait]
pub trait StoreWriteRepo: Send + Sync {
    /// Create the vendor together with its store, configurations, logo and
    /// cover rows.
    async fn provision_vendor(&self, params: NewVendorParams) -> Result<VendorRecord, RepoError>;

    async fn update_store(
        &self,
        store_name: &str,
        params: UpdateStoreParams,
    ) -> Result<StoreRecord, RepoError>;

    async fn create_faq(
        &self,
        store_name: &str,
        params: CreateFaqParams,
    ) -> Result<StoreFaqRecord, RepoError>;

    async fn update_faq(
        &self,
        store_name: &str,
        faq_id: i64,
        params: UpdateFaqParams,
    ) -> Result<StoreFaqRecord, RepoError>;

    async fn delete_faq(&self, store_name: &str, faq_id: i64) -> Result<(), RepoError>;

    async fn update_configurations(
        &self,
        store_name: &str,
        params: UpdateConfigurationsParams,
    ) -> Result<StoreConfigurationsRecord, RepoError>;
}
