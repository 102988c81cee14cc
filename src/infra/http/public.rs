use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::{
    application::{
        error::HttpError,
        storefront::{CatalogSource, StorefrontService},
    },
    freshness::{CachePolicy, Freshness, FreshnessSource, Revalidation, finalize_responses},
};

use super::{
    HealthCheck, db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub storefront: Arc<StorefrontService>,
    pub cache_policy: CachePolicy,
    pub health: Arc<dyn HealthCheck>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/stores/{store_name}", get(store_detail))
        .route("/configurations/{store_name}", get(store_configurations))
        .route("/item-group/{store_name}", get(product_groups))
        .route(
            "/featured-and-category/{store_name}",
            get(featured_and_categories),
        )
        .route("/_health/db", get(public_health))
        .with_state(state)
        .layer(middleware::from_fn(finalize_responses))
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn revalidation_for(state: &HttpState, source: &CatalogSource) -> Revalidation {
    let freshness = if state.cache_policy.is_enabled() {
        state.storefront.freshness(source).await
    } else {
        Freshness::unknown()
    };
    Revalidation::new(freshness, state.cache_policy.clone())
}

fn respond<T: Serialize>(payload: T, revalidation: Revalidation) -> Response {
    let mut response = Json(payload).into_response();
    revalidation.attach(&mut response);
    response
}

async fn store_detail(
    State(state): State<HttpState>,
    Path(store_name): Path<String>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let store = match state.storefront.find_store(&store_name).await {
        Ok(store) => store,
        Err(err) => return HttpError::from(err).into_response(),
    };

    let revalidation = revalidation_for(&state, &FreshnessSource::single(&store)).await;
    if let Some(not_modified) = revalidation.check(&method, &headers) {
        return not_modified;
    }

    match state.storefront.store_detail(store).await {
        Ok(view) => respond(view, revalidation),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn store_configurations(
    State(state): State<HttpState>,
    Path(store_name): Path<String>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let configurations = match state.storefront.find_configurations(&store_name).await {
        Ok(configurations) => configurations,
        Err(err) => return HttpError::from(err).into_response(),
    };

    let revalidation = revalidation_for(&state, &FreshnessSource::single(&configurations)).await;
    if let Some(not_modified) = revalidation.check(&method, &headers) {
        return not_modified;
    }

    respond(
        state.storefront.configurations_view(configurations),
        revalidation,
    )
}

async fn product_groups(
    State(state): State<HttpState>,
    Path(store_name): Path<String>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let source = StorefrontService::store_products_source(&store_name);
    let revalidation = revalidation_for(&state, &source).await;
    if let Some(not_modified) = revalidation.check(&method, &headers) {
        return not_modified;
    }

    match state.storefront.product_groups(&store_name).await {
        Ok(view) => respond(view, revalidation),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn featured_and_categories(
    State(state): State<HttpState>,
    Path(store_name): Path<String>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let source = StorefrontService::featured_and_categories_source(&store_name);
    let revalidation = revalidation_for(&state, &source).await;
    if let Some(not_modified) = revalidation.check(&method, &headers) {
        return not_modified;
    }

    match state.storefront.featured_and_categories(&store_name).await {
        Ok(view) => respond(view, revalidation),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}
