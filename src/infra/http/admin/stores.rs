use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::repos::{UpdateConfigurationsParams, UpdateFaqParams, UpdateStoreParams};
use crate::domain::types::LayoutPosition;

use super::AdminState;
use super::error::{ApiError, vendor_to_api};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreUpdateRequest {
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

impl From<StoreUpdateRequest> for UpdateStoreParams {
    fn from(request: StoreUpdateRequest) -> Self {
        Self {
            name: request.name,
            phone: request.phone,
            description: request.description,
            country: request.country,
            state: request.state,
            address: request.address,
            delivery: request.delivery,
            business_category: request.business_category,
            product_types: request.product_types,
            story: request.story,
            twitter: request.twitter,
            facebook: request.facebook,
            tiktok: request.tiktok,
            snapchat: request.snapchat,
            instagram: request.instagram,
            delivery_time: request.delivery_time,
            policy: request.policy,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FaqCreateRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FaqUpdateRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigurationsUpdateRequest {
    pub brand_color_light: Option<String>,
    pub brand_color_dark: Option<String>,
    pub headline: Option<String>,
    pub subheading: Option<String>,
    pub more_button: Option<String>,
    pub about_button: Option<String>,
    pub position: Option<String>,
    pub latest_first: Option<bool>,
}

pub async fn get_store(
    State(state): State<AdminState>,
    Path(store_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state
        .vendors
        .store(&store_name)
        .await
        .map_err(vendor_to_api)?;

    Ok(Json(store))
}

pub async fn update_store(
    State(state): State<AdminState>,
    Path(store_name): Path<String>,
    Json(payload): Json<StoreUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state
        .vendors
        .update_store(&store_name, payload.into())
        .await
        .map_err(vendor_to_api)?;

    Ok(Json(store))
}

pub async fn list_faqs(
    State(state): State<AdminState>,
    Path(store_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let faqs = state
        .vendors
        .faqs(&store_name)
        .await
        .map_err(vendor_to_api)?;

    Ok(Json(faqs))
}

pub async fn create_faq(
    State(state): State<AdminState>,
    Path(store_name): Path<String>,
    Json(payload): Json<FaqCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let faq = state
        .vendors
        .add_faq(&store_name, payload.question, payload.answer)
        .await
        .map_err(vendor_to_api)?;

    Ok((StatusCode::CREATED, Json(faq)))
}

pub async fn update_faq(
    State(state): State<AdminState>,
    Path((store_name, faq_id)): Path<(String, i64)>,
    Json(payload): Json<FaqUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = UpdateFaqParams {
        question: payload.question,
        answer: payload.answer,
    };
    let faq = state
        .vendors
        .update_faq(&store_name, faq_id, params)
        .await
        .map_err(vendor_to_api)?;

    Ok(Json(faq))
}

pub async fn delete_faq(
    State(state): State<AdminState>,
    Path((store_name, faq_id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .vendors
        .delete_faq(&store_name, faq_id)
        .await
        .map_err(vendor_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_configurations(
    State(state): State<AdminState>,
    Path(store_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let configurations = state
        .vendors
        .configurations(&store_name)
        .await
        .map_err(vendor_to_api)?;

    Ok(Json(configurations))
}

pub async fn update_configurations(
    State(state): State<AdminState>,
    Path(store_name): Path<String>,
    Json(payload): Json<ConfigurationsUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let position = payload
        .position
        .as_deref()
        .map(str::parse::<LayoutPosition>)
        .transpose()
        .map_err(|err| ApiError::bad_request("Invalid position", Some(err)))?;

    let params = UpdateConfigurationsParams {
        brand_color_light: payload.brand_color_light,
        brand_color_dark: payload.brand_color_dark,
        headline: payload.headline,
        subheading: payload.subheading,
        more_button: payload.more_button,
        about_button: payload.about_button,
        position,
        latest_first: payload.latest_first,
    };

    let configurations = state
        .vendors
        .update_configurations(&store_name, params)
        .await
        .map_err(vendor_to_api)?;

    Ok(Json(configurations))
}
