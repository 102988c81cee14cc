//! Vendor-side store management.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CreateFaqParams, NewVendorParams, RepoError, StoreWriteRepo, StorefrontRepo,
    UpdateConfigurationsParams, UpdateFaqParams, UpdateStoreParams,
};
use crate::domain::entities::{StoreConfigurationsRecord, StoreFaqRecord, StoreRecord, VendorRecord};
use crate::domain::error::{DomainError, ensure_hex_colour, ensure_present};

#[derive(Debug, Error)]
pub enum VendorStoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct RegisterVendorCommand {
    pub email: String,
    pub store_name: String,
    pub full_name: Option<String>,
}

#[derive(Clone)]
pub struct VendorStoreService {
    writer: Arc<dyn StoreWriteRepo>,
    reader: Arc<dyn StorefrontRepo>,
}

impl VendorStoreService {
    pub fn new(writer: Arc<dyn StoreWriteRepo>, reader: Arc<dyn StorefrontRepo>) -> Self {
        Self { writer, reader }
    }

    /// The raw store row as the owning vendor edits it.
    pub async fn store(&self, store_name: &str) -> Result<StoreRecord, VendorStoreError> {
        self.reader
            .find_store(store_name)
            .await?
            .ok_or_else(|| DomainError::not_found("store").into())
    }

    pub async fn faqs(&self, store_name: &str) -> Result<Vec<StoreFaqRecord>, VendorStoreError> {
        let store = self.store(store_name).await?;
        Ok(self.reader.load_store_aggregate(store).await?.faqs)
    }

    pub async fn configurations(
        &self,
        store_name: &str,
    ) -> Result<StoreConfigurationsRecord, VendorStoreError> {
        self.reader
            .find_configurations(store_name)
            .await?
            .ok_or_else(|| DomainError::not_found("store_configurations").into())
    }

    pub async fn register(
        &self,
        command: RegisterVendorCommand,
    ) -> Result<VendorRecord, VendorStoreError> {
        let email = command.email.trim().to_ascii_lowercase();
        ensure_present(&email, "email")?;
        if !email.contains('@') {
            return Err(DomainError::validation("email", "must be an email address").into());
        }

        let store_name = command.store_name.trim().to_string();
        ensure_present(&store_name, "store_name")?;
        if store_name.contains('/') {
            return Err(DomainError::validation("store_name", "must not contain `/`").into());
        }

        let vendor = self
            .writer
            .provision_vendor(NewVendorParams {
                email,
                store_name,
                full_name: normalize_optional(command.full_name),
            })
            .await?;

        info!(
            target = "storefront::application::vendor",
            vendor_id = vendor.id,
            store_name = %vendor.store_name,
            "vendor provisioned"
        );
        Ok(vendor)
    }

    pub async fn update_store(
        &self,
        store_name: &str,
        mut params: UpdateStoreParams,
    ) -> Result<StoreRecord, VendorStoreError> {
        if let Some(name) = params.name.as_mut() {
            *name = name.trim().to_string();
            ensure_present(name, "name")?;
        }
        if let Some(types) = params.product_types.as_mut() {
            types.retain(|value| !value.trim().is_empty());
        }

        Ok(self.writer.update_store(store_name, params).await?)
    }

    pub async fn add_faq(
        &self,
        store_name: &str,
        question: String,
        answer: String,
    ) -> Result<StoreFaqRecord, VendorStoreError> {
        let question = question.trim().to_string();
        let answer = answer.trim().to_string();
        ensure_present(&question, "question")?;
        ensure_present(&answer, "answer")?;

        Ok(self
            .writer
            .create_faq(store_name, CreateFaqParams { question, answer })
            .await?)
    }

    pub async fn update_faq(
        &self,
        store_name: &str,
        faq_id: i64,
        params: UpdateFaqParams,
    ) -> Result<StoreFaqRecord, VendorStoreError> {
        let params = UpdateFaqParams {
            question: trim_required(params.question, "question")?,
            answer: trim_required(params.answer, "answer")?,
        };

        Ok(self.writer.update_faq(store_name, faq_id, params).await?)
    }

    pub async fn delete_faq(&self, store_name: &str, faq_id: i64) -> Result<(), VendorStoreError> {
        Ok(self.writer.delete_faq(store_name, faq_id).await?)
    }

    pub async fn update_configurations(
        &self,
        store_name: &str,
        params: UpdateConfigurationsParams,
    ) -> Result<StoreConfigurationsRecord, VendorStoreError> {
        if let Some(colour) = params.brand_color_light.as_deref() {
            ensure_hex_colour(colour, "brand_color_light")?;
        }
        if let Some(colour) = params.brand_color_dark.as_deref() {
            ensure_hex_colour(colour, "brand_color_dark")?;
        }

        Ok(self
            .writer
            .update_configurations(store_name, params)
            .await?)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn trim_required(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, DomainError> {
    match value {
        Some(value) => {
            let trimmed = value.trim().to_string();
            ensure_present(&trimmed, field)?;
            Ok(Some(trimmed))
        }
        None => Ok(None),
    }
}
