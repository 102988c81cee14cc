//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::types::LayoutPosition;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRecord {
    pub id: i64,
    pub email: String,
    pub store_name: String,
    pub full_name: Option<String>,
    pub niche: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub date_joined: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreRecord {
    pub id: i64,
    pub vendor_id: i64,
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
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreFaqRecord {
    pub id: i64,
    pub store_id: i64,
    pub question: String,
    pub answer: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreConfigurationsRecord {
    pub id: i64,
    pub vendor_id: i64,
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
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreLogoRecord {
    pub id: i64,
    pub vendor_id: i64,
    pub logo: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreCoverRecord {
    pub id: i64,
    pub vendor_id: i64,
    pub cover_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Store plus everything its public detail payload embeds.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreAggregate {
    pub store: StoreRecord,
    pub faqs: Vec<StoreFaqRecord>,
    pub configurations: Option<StoreConfigurationsRecord>,
    pub logo: Option<StoreLogoRecord>,
    pub cover: Option<StoreCoverRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub slug: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub description: String,
    /// Decimal rendered by the database, e.g. `"1200.00"`.
    pub price: String,
    pub discount_price: Option<String>,
    pub quantity: i32,
    pub availability: bool,
    pub hot_deal: bool,
    pub featured: bool,
    pub recent: bool,
    pub extra_info: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductImageRecord {
    pub id: i64,
    pub product_id: i64,
    pub image: String,
    pub is_thumbnail: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOptionRecord {
    pub id: i64,
    pub product_id: i64,
    pub note: Option<String>,
    pub options: Vec<String>,
    pub as_template: bool,
    pub template_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Product plus the relations the featured listing embeds.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: ProductRecord,
    pub category: Option<CategoryRecord>,
    pub images: Vec<ProductImageRecord>,
    pub options: Vec<ProductOptionRecord>,
}

/// Count and lead product of one product grouping (all, featured, recent).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductGroupSlice {
    pub count: u64,
    pub primary_image: Option<String>,
}
