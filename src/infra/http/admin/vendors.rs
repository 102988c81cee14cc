use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::application::vendor::RegisterVendorCommand;

use super::AdminState;
use super::error::{ApiError, vendor_to_api};

#[derive(Debug, Deserialize)]
pub struct VendorCreateRequest {
    pub email: String,
    pub store_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

pub async fn register_vendor(
    State(state): State<AdminState>,
    Json(payload): Json<VendorCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = RegisterVendorCommand {
        email: payload.email,
        store_name: payload.store_name,
        full_name: payload.full_name,
    };

    let vendor = state
        .vendors
        .register(command)
        .await
        .map_err(vendor_to_api)?;

    Ok((StatusCode::CREATED, Json(vendor)))
}
