//! Read-only aggregates feeding the dashboard maps and selectors.

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::{ClientLocation, Product, TopProductByLocation},
    services::{client_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/maps", get(client_map))
        .route("/field_product", get(product_field))
        .route("/productsmaps", get(products_map))
}

#[utoipa::path(
    get,
    path = "/api/maps",
    responses(
        (status = 200, description = "Every client with its location", body = Vec<ClientLocation>)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn client_map(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<ClientLocation>>> {
    Ok(Json(client_service::client_locations(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/field_product",
    responses(
        (status = 200, description = "All products ordered by date_ajout", body = Vec<Product>)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn product_field(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(product_service::all_products(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/productsmaps",
    responses(
        (status = 200, description = "Best-selling product per localisation", body = Vec<TopProductByLocation>)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn products_map(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<TopProductByLocation>>> {
    Ok(Json(product_service::top_products_by_location(&state).await?))
}
