mod error;
mod stores;
mod vendors;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware,
    response::Response,
    routing::{get, post, put},
};

use crate::{application::vendor::VendorStoreService, freshness::finalize_responses};

use super::{
    HealthCheck, db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct AdminState {
    pub vendors: Arc<VendorStoreService>,
    pub health: Arc<dyn HealthCheck>,
}

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/vendors", post(vendors::register_vendor))
        .route(
            "/stores/{store_name}",
            get(stores::get_store).put(stores::update_store),
        )
        .route(
            "/stores/{store_name}/faqs",
            get(stores::list_faqs).post(stores::create_faq),
        )
        .route(
            "/stores/{store_name}/faqs/{faq_id}",
            put(stores::update_faq).delete(stores::delete_faq),
        )
        .route(
            "/stores/{store_name}/configurations",
            get(stores::get_configurations).put(stores::update_configurations),
        )
        .route("/_health/db", get(admin_health))
        .with_state(state)
        .layer(middleware::from_fn(finalize_responses))
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn admin_health(State(state): State<AdminState>) -> Response {
    db_health_response(state.health.ping().await)
}
