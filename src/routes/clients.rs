use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::clients::ClientPayload,
    error::AppResult,
    extract::{ApiJson, ApiQuery},
    middleware::auth::AuthUser,
    models::Client,
    response::{ApiResponse, CreatedId, Page},
    routes::params::{Pagination, parse_id},
    services::client_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

#[utoipa::path(
    get,
    path = "/api/clients",
    params(Pagination),
    responses(
        (status = 200, description = "Clients, newest registration first", body = Page<Client>)
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<Page<Client>>> {
    let page = client_service::list_clients(&state, pagination).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client", body = ApiResponse<Client>),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Client not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let id = parse_id(&id)?;
    let resp = client_service::get_client(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Client created", body = ApiResponse<CreatedId>),
        (status = 400, description = "date_inscription is required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiJson(payload): ApiJson<ClientPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    let resp = client_service::create_client(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = i64, Path, description = "Client ID")),
    request_body = ClientPayload,
    responses(
        (status = 200, description = "Updated client", body = ApiResponse<Client>),
        (status = 400, description = "Invalid ID or missing date_inscription"),
        (status = 404, description = "Client not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ClientPayload>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let id = parse_id(&id)?;
    let resp = client_service::update_client(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client deleted"),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Client still has transactions"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id)?;
    let resp = client_service::delete_client(&state, id).await?;
    Ok(Json(resp))
}
