//! In-memory repositories shared by the HTTP integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use storefront::application::repos::{
    CatalogCollection, CatalogStats, CreateFaqParams, NewVendorParams, ProductGroupFilter,
    RepoError, StoreWriteRepo, StorefrontRepo, UpdateConfigurationsParams, UpdateFaqParams,
    UpdateStoreParams,
};
use storefront::application::storefront::{MediaUrls, StorefrontService, primary_image};
use storefront::application::vendor::VendorStoreService;
use storefront::domain::entities::{
    CategoryRecord, ProductDetail, ProductGroupSlice, ProductImageRecord, ProductRecord,
    StoreAggregate, StoreConfigurationsRecord, StoreCoverRecord, StoreFaqRecord, StoreLogoRecord,
    StoreRecord, VendorRecord,
};
use storefront::domain::types::LayoutPosition;
use storefront::freshness::{CachePolicy, CollectionStats};
use storefront::infra::http::{self, AdminState, HealthCheck, HttpState};
use time::OffsetDateTime;
use time::macros::datetime;

pub const NEW_YEAR_2024: OffsetDateTime = datetime!(2024-01-01 00:00:00 UTC);
pub const MEDIA_BASE: &str = "https://cdn.example.test/media";

#[derive(Default)]
struct CatalogState {
    clock: Option<OffsetDateTime>,
    next_id: i64,
    vendors: Vec<VendorRecord>,
    stores: Vec<StoreRecord>,
    faqs: Vec<StoreFaqRecord>,
    configurations: Vec<StoreConfigurationsRecord>,
    products: Vec<ProductDetail>,
    categories: Vec<CategoryRecord>,
    failing_counts: HashSet<&'static str>,
    failing_latest: HashSet<&'static str>,
    unhealthy: bool,
}

impl CatalogState {
    fn now(&self) -> OffsetDateTime {
        self.clock.unwrap_or(NEW_YEAR_2024)
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn vendor_id(&self, store_name: &str) -> Option<i64> {
        self.vendors
            .iter()
            .find(|vendor| vendor.store_name.eq_ignore_ascii_case(store_name))
            .map(|vendor| vendor.id)
    }

    fn store_mut(&mut self, store_name: &str) -> Result<&mut StoreRecord, RepoError> {
        let vendor_id = self.vendor_id(store_name).ok_or(RepoError::NotFound)?;
        self.stores
            .iter_mut()
            .find(|store| store.vendor_id == vendor_id)
            .ok_or(RepoError::NotFound)
    }

    fn touch_store(&mut self, store_name: &str) -> Result<i64, RepoError> {
        let now = self.now();
        let store = self.store_mut(store_name)?;
        store.updated_at = now;
        Ok(store.id)
    }

    fn store_products(&self, store_name: &str) -> Vec<&ProductDetail> {
        let Some(vendor_id) = self.vendor_id(store_name) else {
            return Vec::new();
        };
        let mut products: Vec<&ProductDetail> = self
            .products
            .iter()
            .filter(|detail| detail.product.vendor_id == vendor_id)
            .collect();
        products.sort_by_key(|detail| detail.product.id);
        products
    }

    fn collection_updates(&self, collection: &CatalogCollection) -> Vec<OffsetDateTime> {
        match collection {
            CatalogCollection::StoreProducts { store_name } => self
                .store_products(store_name)
                .into_iter()
                .map(|detail| detail.product.updated_at)
                .collect(),
            CatalogCollection::FeaturedProducts { store_name, limit } => self
                .store_products(store_name)
                .into_iter()
                .filter(|detail| detail.product.featured)
                .take(usize::try_from(*limit).unwrap_or(0))
                .map(|detail| detail.product.updated_at)
                .collect(),
            CatalogCollection::Categories => self
                .categories
                .iter()
                .map(|category| category.updated_at)
                .collect(),
        }
    }
}

/// Catalog held in memory; implements every repository seam the routers use.
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
}

impl MemoryCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Timestamp applied by subsequent writes.
    pub fn set_clock(&self, now: OffsetDateTime) {
        self.state.lock().unwrap().clock = Some(now);
    }

    /// Seed a vendor and store with explicit ids.
    pub fn seed_store(&self, store_id: i64, store_name: &str, updated_at: OffsetDateTime) {
        let mut state = self.state.lock().unwrap();
        let vendor_id = store_id + 100;
        state.vendors.push(VendorRecord {
            id: vendor_id,
            email: format!("{}@example.test", store_name.to_lowercase()),
            store_name: store_name.to_string(),
            full_name: None,
            niche: None,
            location: None,
            is_active: true,
            date_joined: updated_at,
            updated_at,
        });
        state.stores.push(blank_store(store_id, vendor_id, store_name, updated_at));
        state
            .configurations
            .push(blank_configurations(store_id, vendor_id, updated_at));
        state.next_id = state.next_id.max(vendor_id);
    }

    pub fn set_store_updated_at(&self, store_name: &str, updated_at: OffsetDateTime) {
        let mut state = self.state.lock().unwrap();
        if let Ok(store) = state.store_mut(store_name) {
            store.updated_at = updated_at;
        }
    }

    pub fn add_product(
        &self,
        store_name: &str,
        name: &str,
        featured: bool,
        updated_at: OffsetDateTime,
    ) -> i64 {
        let mut state = self.state.lock().unwrap();
        let vendor_id = state.vendor_id(store_name).unwrap();
        let id = state.next_id();
        state.products.push(ProductDetail {
            product: ProductRecord {
                id,
                vendor_id,
                name: name.to_string(),
                category_id: None,
                description: format!("{name} description"),
                price: "1200.00".to_string(),
                discount_price: None,
                quantity: 3,
                availability: true,
                hot_deal: false,
                featured,
                recent: false,
                extra_info: String::new(),
                created_at: updated_at,
                updated_at,
            },
            category: None,
            images: Vec::new(),
            options: Vec::new(),
        });
        id
    }

    pub fn add_image(&self, product_id: i64, image: &str, is_thumbnail: bool) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = state.now();
        if let Some(detail) = state
            .products
            .iter_mut()
            .find(|detail| detail.product.id == product_id)
        {
            detail.images.push(ProductImageRecord {
                id,
                product_id,
                image: image.to_string(),
                is_thumbnail,
                created_at: now,
                updated_at: now,
            });
        }
    }

    pub fn remove_product(&self, product_id: i64) {
        self.state
            .lock()
            .unwrap()
            .products
            .retain(|detail| detail.product.id != product_id);
    }

    pub fn add_category(&self, name: &str, updated_at: OffsetDateTime) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.categories.push(CategoryRecord {
            id,
            name: name.to_string(),
            image: Some(format!("categories/{}.png", name.to_lowercase())),
            slug: name.to_lowercase(),
            created_at: updated_at,
            updated_at,
        });
    }

    /// Make `member_count` fail for collections of `type_name`.
    pub fn fail_counts(&self, type_name: &'static str) {
        self.state.lock().unwrap().failing_counts.insert(type_name);
    }

    /// Make `latest_update` fail for collections of `type_name`.
    pub fn fail_latest(&self, type_name: &'static str) {
        self.state.lock().unwrap().failing_latest.insert(type_name);
    }

    pub fn set_unhealthy(&self) {
        self.state.lock().unwrap().unhealthy = true;
    }

    pub fn store(&self, store_name: &str) -> Option<StoreRecord> {
        let mut state = self.state.lock().unwrap();
        state.store_mut(store_name).ok().cloned()
    }

    pub fn faqs(&self) -> Vec<StoreFaqRecord> {
        self.state.lock().unwrap().faqs.clone()
    }
}

fn blank_store(id: i64, vendor_id: i64, name: &str, at: OffsetDateTime) -> StoreRecord {
    StoreRecord {
        id,
        vendor_id,
        name: name.to_string(),
        phone: None,
        description: None,
        country: None,
        state: None,
        address: None,
        delivery: None,
        business_category: None,
        product_types: Vec::new(),
        story: None,
        image_one: None,
        image_two: None,
        image_three: None,
        twitter: None,
        facebook: None,
        tiktok: None,
        snapchat: None,
        instagram: None,
        delivery_time: None,
        policy: None,
        created_at: at,
        updated_at: at,
    }
}

fn blank_configurations(id: i64, vendor_id: i64, at: OffsetDateTime) -> StoreConfigurationsRecord {
    StoreConfigurationsRecord {
        id,
        vendor_id,
        background_image_one: None,
        background_image_two: None,
        background_image_three: None,
        brand_color_light: "#ffffff".to_string(),
        brand_color_dark: "#000000".to_string(),
        headline: None,
        subheading: None,
        more_button: None,
        about_button: None,
        position: LayoutPosition::Center,
        latest_first: true,
        created_at: at,
        updated_at: at,
    }
}

#[async_trait]
impl StorefrontRepo for MemoryCatalog {
    async fn find_store(&self, store_name: &str) -> Result<Option<StoreRecord>, RepoError> {
        Ok(self.store(store_name))
    }

    async fn load_store_aggregate(&self, store: StoreRecord) -> Result<StoreAggregate, RepoError> {
        let state = self.state.lock().unwrap();
        let faqs = state
            .faqs
            .iter()
            .filter(|faq| faq.store_id == store.id)
            .cloned()
            .collect();
        let configurations = state
            .configurations
            .iter()
            .find(|config| config.vendor_id == store.vendor_id)
            .cloned();
        let logo = Some(StoreLogoRecord {
            id: store.id,
            vendor_id: store.vendor_id,
            logo: Some("logos/brand.png".to_string()),
            updated_at: store.updated_at,
        });
        let cover = Some(StoreCoverRecord {
            id: store.id,
            vendor_id: store.vendor_id,
            cover_image: None,
            updated_at: store.updated_at,
        });

        Ok(StoreAggregate {
            store,
            faqs,
            configurations,
            logo,
            cover,
        })
    }

    async fn find_configurations(
        &self,
        store_name: &str,
    ) -> Result<Option<StoreConfigurationsRecord>, RepoError> {
        let state = self.state.lock().unwrap();
        let Some(vendor_id) = state.vendor_id(store_name) else {
            return Ok(None);
        };
        Ok(state
            .configurations
            .iter()
            .find(|config| config.vendor_id == vendor_id)
            .cloned())
    }

    async fn product_group(
        &self,
        store_name: &str,
        filter: ProductGroupFilter,
    ) -> Result<ProductGroupSlice, RepoError> {
        let state = self.state.lock().unwrap();
        let members: Vec<&ProductDetail> = state
            .store_products(store_name)
            .into_iter()
            .filter(|detail| match filter {
                ProductGroupFilter::All => true,
                ProductGroupFilter::Featured => detail.product.featured,
                ProductGroupFilter::Recent => detail.product.recent,
            })
            .collect();

        Ok(ProductGroupSlice {
            count: members.len() as u64,
            primary_image: members
                .first()
                .and_then(|detail| primary_image(&detail.images))
                .map(|image| image.image.clone()),
        })
    }

    async fn list_featured_products(
        &self,
        store_name: &str,
        limit: i64,
    ) -> Result<Vec<ProductDetail>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .store_products(store_name)
            .into_iter()
            .filter(|detail| detail.product.featured)
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(self.state.lock().unwrap().categories.clone())
    }
}

#[async_trait]
impl CollectionStats<CatalogCollection> for MemoryCatalog {
    async fn latest_update(
        &self,
        collection: &CatalogCollection,
    ) -> Result<Option<OffsetDateTime>, RepoError> {
        let state = self.state.lock().unwrap();
        if state.failing_latest.contains(collection_type(collection)) {
            return Err(RepoError::Timeout);
        }
        Ok(state.collection_updates(collection).into_iter().max())
    }

    async fn member_count(&self, collection: &CatalogCollection) -> Result<u64, RepoError> {
        let state = self.state.lock().unwrap();
        if state.failing_counts.contains(collection_type(collection)) {
            return Err(RepoError::Timeout);
        }
        Ok(state.collection_updates(collection).len() as u64)
    }
}

fn collection_type(collection: &CatalogCollection) -> &'static str {
    use storefront::freshness::NamedCollection;
    collection.type_name()
}

#[async_trait]
impl StoreWriteRepo for MemoryCatalog {
    async fn provision_vendor(&self, params: NewVendorParams) -> Result<VendorRecord, RepoError> {
        let mut state = self.state.lock().unwrap();
        if state.vendor_id(&params.store_name).is_some() {
            return Err(RepoError::Duplicate {
                constraint: "vendors_store_name_lower_key".to_string(),
            });
        }
        if state.vendors.iter().any(|vendor| vendor.email == params.email) {
            return Err(RepoError::Duplicate {
                constraint: "vendors_email_key".to_string(),
            });
        }

        let now = state.now();
        let vendor_id = state.next_id();
        let store_id = state.next_id();
        let vendor = VendorRecord {
            id: vendor_id,
            email: params.email,
            store_name: params.store_name.clone(),
            full_name: params.full_name,
            niche: None,
            location: None,
            is_active: true,
            date_joined: now,
            updated_at: now,
        };
        state.vendors.push(vendor.clone());
        state
            .stores
            .push(blank_store(store_id, vendor_id, &params.store_name, now));
        state
            .configurations
            .push(blank_configurations(store_id, vendor_id, now));
        Ok(vendor)
    }

    async fn update_store(
        &self,
        store_name: &str,
        params: UpdateStoreParams,
    ) -> Result<StoreRecord, RepoError> {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let store = state.store_mut(store_name)?;
        if let Some(name) = params.name {
            store.name = name;
        }
        if let Some(description) = params.description {
            store.description = Some(description);
        }
        if let Some(product_types) = params.product_types {
            store.product_types = product_types;
        }
        if let Some(policy) = params.policy {
            store.policy = Some(policy);
        }
        store.updated_at = now;
        Ok(store.clone())
    }

    async fn create_faq(
        &self,
        store_name: &str,
        params: CreateFaqParams,
    ) -> Result<StoreFaqRecord, RepoError> {
        let mut state = self.state.lock().unwrap();
        let store_id = state.touch_store(store_name)?;
        let now = state.now();
        let faq = StoreFaqRecord {
            id: state.next_id(),
            store_id,
            question: params.question,
            answer: params.answer,
            created_at: now,
            updated_at: now,
        };
        state.faqs.push(faq.clone());
        Ok(faq)
    }

    async fn update_faq(
        &self,
        store_name: &str,
        faq_id: i64,
        params: UpdateFaqParams,
    ) -> Result<StoreFaqRecord, RepoError> {
        let mut state = self.state.lock().unwrap();
        let store_id = state.touch_store(store_name)?;
        let now = state.now();
        let faq = state
            .faqs
            .iter_mut()
            .find(|faq| faq.id == faq_id && faq.store_id == store_id)
            .ok_or(RepoError::NotFound)?;
        if let Some(question) = params.question {
            faq.question = question;
        }
        if let Some(answer) = params.answer {
            faq.answer = answer;
        }
        faq.updated_at = now;
        Ok(faq.clone())
    }

    async fn delete_faq(&self, store_name: &str, faq_id: i64) -> Result<(), RepoError> {
        let mut state = self.state.lock().unwrap();
        let store_id = state.store_mut(store_name)?.id;
        let before = state.faqs.len();
        state
            .faqs
            .retain(|faq| !(faq.id == faq_id && faq.store_id == store_id));
        if state.faqs.len() == before {
            return Err(RepoError::NotFound);
        }
        state.touch_store(store_name)?;
        Ok(())
    }

    async fn update_configurations(
        &self,
        store_name: &str,
        params: UpdateConfigurationsParams,
    ) -> Result<StoreConfigurationsRecord, RepoError> {
        let mut state = self.state.lock().unwrap();
        state.touch_store(store_name)?;
        let now = state.now();
        let vendor_id = state.vendor_id(store_name).ok_or(RepoError::NotFound)?;
        let config = state
            .configurations
            .iter_mut()
            .find(|config| config.vendor_id == vendor_id)
            .ok_or(RepoError::NotFound)?;
        if let Some(colour) = params.brand_color_light {
            config.brand_color_light = colour;
        }
        if let Some(colour) = params.brand_color_dark {
            config.brand_color_dark = colour;
        }
        if let Some(headline) = params.headline {
            config.headline = Some(headline);
        }
        if let Some(position) = params.position {
            config.position = position;
        }
        if let Some(latest_first) = params.latest_first {
            config.latest_first = latest_first;
        }
        config.updated_at = now;
        Ok(config.clone())
    }
}

#[async_trait]
impl HealthCheck for MemoryCatalog {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        if self.state.lock().unwrap().unhealthy {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

pub fn public_router(catalog: &Arc<MemoryCatalog>, policy: CachePolicy) -> Router {
    let repo: Arc<dyn StorefrontRepo> = catalog.clone();
    let stats: Arc<CatalogStats> = catalog.clone();
    let health: Arc<dyn HealthCheck> = catalog.clone();
    let storefront = Arc::new(StorefrontService::new(repo, stats, MediaUrls::new(MEDIA_BASE)));

    http::build_router(HttpState {
        storefront,
        cache_policy: policy,
        health,
    })
}

pub fn admin_router(catalog: &Arc<MemoryCatalog>) -> Router {
    let writer: Arc<dyn StoreWriteRepo> = catalog.clone();
    let reader: Arc<dyn StorefrontRepo> = catalog.clone();
    let health: Arc<dyn HealthCheck> = catalog.clone();

    http::build_admin_router(AdminState {
        vendors: Arc::new(VendorStoreService::new(writer, reader)),
        health,
    })
}
