//! Row mappings for vendors, stores and the records a store embeds.

use sqlx::types::Json;
use time::OffsetDateTime;

use crate::domain::entities::{
    StoreConfigurationsRecord, StoreCoverRecord, StoreFaqRecord, StoreLogoRecord, StoreRecord,
    VendorRecord,
};
use crate::domain::types::LayoutPosition;

pub(super) const VENDOR_COLUMNS: &str = "v.id, v.email, v.store_name, v.full_name, v.niche, \
    v.location, v.is_active, v.date_joined, v.updated_at";

pub(super) const STORE_COLUMNS: &str = "s.id, s.vendor_id, s.name, s.phone, s.description, \
    s.country, s.state, s.address, s.delivery, s.business_category, s.product_types, s.story, \
    s.image_one, s.image_two, s.image_three, s.twitter, s.facebook, s.tiktok, s.snapchat, \
    s.instagram, s.delivery_time, s.policy, s.created_at, s.updated_at";

pub(super) const FAQ_COLUMNS: &str = "f.id, f.store_id, f.question, f.answer, f.created_at, \
    f.updated_at";

pub(super) const CONFIGURATIONS_COLUMNS: &str = "c.id, c.vendor_id, c.background_image_one, \
    c.background_image_two, c.background_image_three, c.brand_color_light, c.brand_color_dark, \
    c.headline, c.subheading, c.more_button, c.about_button, c.position, c.latest_first, \
    c.created_at, c.updated_at";

/// Case-insensitive join from a store-side alias to its vendor's store name.
pub(super) const VENDOR_NAME_MATCH: &str = "LOWER(v.store_name) = LOWER($1)";

#[derive(sqlx::FromRow)]
pub(super) struct VendorRow {
    id: i64,
    email: String,
    store_name: String,
    full_name: Option<String>,
    niche: Option<String>,
    location: Option<String>,
    is_active: bool,
    date_joined: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<VendorRow> for VendorRecord {
    fn from(row: VendorRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            store_name: row.store_name,
            full_name: row.full_name,
            niche: row.niche,
            location: row.location,
            is_active: row.is_active,
            date_joined: row.date_joined,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct StoreRow {
    id: i64,
    vendor_id: i64,
    name: String,
    phone: Option<String>,
    description: Option<String>,
    country: Option<String>,
    state: Option<String>,
    address: Option<String>,
    delivery: Option<String>,
    business_category: Option<String>,
    product_types: Json<Vec<String>>,
    story: Option<String>,
    image_one: Option<String>,
    image_two: Option<String>,
    image_three: Option<String>,
    twitter: Option<String>,
    facebook: Option<String>,
    tiktok: Option<String>,
    snapchat: Option<String>,
    instagram: Option<String>,
    delivery_time: Option<String>,
    policy: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<StoreRow> for StoreRecord {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            vendor_id: row.vendor_id,
            name: row.name,
            phone: row.phone,
            description: row.description,
            country: row.country,
            state: row.state,
            address: row.address,
            delivery: row.delivery,
            business_category: row.business_category,
            product_types: row.product_types.0,
            story: row.story,
            image_one: row.image_one,
            image_two: row.image_two,
            image_three: row.image_three,
            twitter: row.twitter,
            facebook: row.facebook,
            tiktok: row.tiktok,
            snapchat: row.snapchat,
            instagram: row.instagram,
            delivery_time: row.delivery_time,
            policy: row.policy,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct FaqRow {
    id: i64,
    store_id: i64,
    question: String,
    answer: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<FaqRow> for StoreFaqRecord {
    fn from(row: FaqRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            question: row.question,
            answer: row.answer,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ConfigurationsRow {
    id: i64,
    vendor_id: i64,
    background_image_one: Option<String>,
    background_image_two: Option<String>,
    background_image_three: Option<String>,
    brand_color_light: String,
    brand_color_dark: String,
    headline: Option<String>,
    subheading: Option<String>,
    more_button: Option<String>,
    about_button: Option<String>,
    position: LayoutPosition,
    latest_first: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ConfigurationsRow> for StoreConfigurationsRecord {
    fn from(row: ConfigurationsRow) -> Self {
        Self {
            id: row.id,
            vendor_id: row.vendor_id,
            background_image_one: row.background_image_one,
            background_image_two: row.background_image_two,
            background_image_three: row.background_image_three,
            brand_color_light: row.brand_color_light,
            brand_color_dark: row.brand_color_dark,
            headline: row.headline,
            subheading: row.subheading,
            more_button: row.more_button,
            about_button: row.about_button,
            position: row.position,
            latest_first: row.latest_first,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct LogoRow {
    id: i64,
    vendor_id: i64,
    logo: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<LogoRow> for StoreLogoRecord {
    fn from(row: LogoRow) -> Self {
        Self {
            id: row.id,
            vendor_id: row.vendor_id,
            logo: row.logo,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct CoverRow {
    id: i64,
    vendor_id: i64,
    cover_image: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<CoverRow> for StoreCoverRecord {
    fn from(row: CoverRow) -> Self {
        Self {
            id: row.id,
            vendor_id: row.vendor_id,
            cover_image: row.cover_image,
            updated_at: row.updated_at,
        }
    }
}
