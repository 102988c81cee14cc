//! Vendor-side writes.

use async_trait::async_trait;
use sqlx::types::Json;
use tracing::debug;

use crate::application::repos::{
    CreateFaqParams, NewVendorParams, RepoError, StoreWriteRepo, UpdateConfigurationsParams,
    UpdateFaqParams, UpdateStoreParams,
};
use crate::domain::entities::{StoreConfigurationsRecord, StoreFaqRecord, StoreRecord, VendorRecord};

use super::{
    PostgresRepositories, map_sqlx_error,
    stores::{
        CONFIGURATIONS_COLUMNS, ConfigurationsRow, FAQ_COLUMNS, FaqRow, STORE_COLUMNS, StoreRow,
        VENDOR_COLUMNS, VendorRow,
    },
};

#[async_trait]
impl StoreWriteRepo for PostgresRepositories {
    async fn provision_vendor(&self, params: NewVendorParams) -> Result<VendorRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let vendor_sql = format!(
            "INSERT INTO vendors AS v (email, store_name, full_name) \
             VALUES ($1, $2, $3) \
             RETURNING {VENDOR_COLUMNS}"
        );
        let vendor = sqlx::query_as::<_, VendorRow>(&vendor_sql)
            .bind(&params.email)
            .bind(&params.store_name)
            .bind(params.full_name.as_deref())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        let vendor = VendorRecord::from(vendor);

        sqlx::query("INSERT INTO stores (vendor_id, name) VALUES ($1, $2)")
            .bind(vendor.id)
            .bind(&vendor.store_name)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        for table in ["store_configurations", "store_logos", "store_covers"] {
            sqlx::query(&format!("INSERT INTO {table} (vendor_id) VALUES ($1)"))
                .bind(vendor.id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            target = "storefront::infra::db::vendors",
            vendor_id = vendor.id,
            "provisioned store rows"
        );
        Ok(vendor)
    }

    async fn update_store(
        &self,
        store_name: &str,
        params: UpdateStoreParams,
    ) -> Result<StoreRecord, RepoError> {
        let sql = format!(
            "UPDATE stores AS s SET \
                name = COALESCE($2, s.name), \
                phone = COALESCE($3, s.phone), \
                description = COALESCE($4, s.description), \
                country = COALESCE($5, s.country), \
                state = COALESCE($6, s.state), \
                address = COALESCE($7, s.address), \
                delivery = COALESCE($8, s.delivery), \
                business_category = COALESCE($9, s.business_category), \
                product_types = COALESCE($10, s.product_types), \
                story = COALESCE($11, s.story), \
                twitter = COALESCE($12, s.twitter), \
                facebook = COALESCE($13, s.facebook), \
                tiktok = COALESCE($14, s.tiktok), \
                snapchat = COALESCE($15, s.snapchat), \
                instagram = COALESCE($16, s.instagram), \
                delivery_time = COALESCE($17, s.delivery_time), \
                policy = COALESCE($18, s.policy) \
             FROM vendors v \
             WHERE v.id = s.vendor_id AND LOWER(v.store_name) = LOWER($1) \
             RETURNING {STORE_COLUMNS}"
        );

        let row = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(store_name)
            .bind(params.name)
            .bind(params.phone)
            .bind(params.description)
            .bind(params.country)
            .bind(params.state)
            .bind(params.address)
            .bind(params.delivery)
            .bind(params.business_category)
            .bind(params.product_types.map(Json))
            .bind(params.story)
            .bind(params.twitter)
            .bind(params.facebook)
            .bind(params.tiktok)
            .bind(params.snapchat)
            .bind(params.instagram)
            .bind(params.delivery_time)
            .bind(params.policy)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(StoreRecord::from).ok_or(RepoError::NotFound)
    }

    async fn create_faq(
        &self,
        store_name: &str,
        params: CreateFaqParams,
    ) -> Result<StoreFaqRecord, RepoError> {
        let sql = format!(
            "INSERT INTO store_faqs AS f (store_id, question, answer) \
             SELECT s.id, $2, $3 FROM stores s \
             INNER JOIN vendors v ON v.id = s.vendor_id \
             WHERE LOWER(v.store_name) = LOWER($1) \
             RETURNING {FAQ_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(store_name)
            .bind(&params.question)
            .bind(&params.answer)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(StoreFaqRecord::from).ok_or(RepoError::NotFound)
    }

    async fn update_faq(
        &self,
        store_name: &str,
        faq_id: i64,
        params: UpdateFaqParams,
    ) -> Result<StoreFaqRecord, RepoError> {
        let sql = format!(
            "UPDATE store_faqs AS f SET \
                question = COALESCE($3, f.question), \
                answer = COALESCE($4, f.answer) \
             FROM stores s \
             INNER JOIN vendors v ON v.id = s.vendor_id \
             WHERE f.id = $2 AND f.store_id = s.id AND LOWER(v.store_name) = LOWER($1) \
             RETURNING {FAQ_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FaqRow>(&sql)
            .bind(store_name)
            .bind(faq_id)
            .bind(params.question)
            .bind(params.answer)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(StoreFaqRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_faq(&self, store_name: &str, faq_id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(
            "DELETE FROM store_faqs f \
             USING stores s, vendors v \
             WHERE f.id = $2 AND f.store_id = s.id AND v.id = s.vendor_id \
               AND LOWER(v.store_name) = LOWER($1)",
        )
        .bind(store_name)
        .bind(faq_id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn update_configurations(
        &self,
        store_name: &str,
        params: UpdateConfigurationsParams,
    ) -> Result<StoreConfigurationsRecord, RepoError> {
        let sql = format!(
            "UPDATE store_configurations AS c SET \
                brand_color_light = COALESCE($2, c.brand_color_light), \
                brand_color_dark = COALESCE($3, c.brand_color_dark), \
                headline = COALESCE($4, c.headline), \
                subheading = COALESCE($5, c.subheading), \
                more_button = COALESCE($6, c.more_button), \
                about_button = COALESCE($7, c.about_button), \
                position = COALESCE($8, c.position), \
                latest_first = COALESCE($9, c.latest_first) \
             FROM vendors v \
             WHERE v.id = c.vendor_id AND LOWER(v.store_name) = LOWER($1) \
             RETURNING {CONFIGURATIONS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ConfigurationsRow>(&sql)
            .bind(store_name)
            .bind(params.brand_color_light)
            .bind(params.brand_color_dark)
            .bind(params.headline)
            .bind(params.subheading)
            .bind(params.more_button)
            .bind(params.about_button)
            .bind(params.position)
            .bind(params.latest_first)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(StoreConfigurationsRecord::from)
            .ok_or(RepoError::NotFound)
    }
}
