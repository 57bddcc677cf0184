use axum::{
    Json, Router,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    routing::get,
};

use crate::{
    dto::users::{UserForm, UserPayload},
    error::{AppError, AppResult},
    extract::{ApiJson, ApiQuery},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, CreatedId, Page},
    routes::params::{Pagination, parse_id},
    services::user_service,
    state::AppState,
    upload::UploadedFile,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

/// Accepts `application/json` or `multipart/form-data` (with an optional
/// `profile_pic` file part).
impl<S> FromRequest<S> for UserForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let ApiJson(fields) = ApiJson::<UserPayload>::from_request(req, state).await?;
            return Ok(UserForm {
                fields,
                profile_pic: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state).await?;

        let mut form = UserForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "profile_pic" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if !bytes.is_empty() {
                    form.profile_pic = Some(UploadedFile { file_name, bytes });
                }
                continue;
            }

            let slot = match name.as_str() {
                "email" => &mut form.fields.email,
                "first_name" => &mut form.fields.first_name,
                "last_name" => &mut form.fields.last_name,
                "username" => &mut form.fields.username,
                "password" => &mut form.fields.password,
                _ => continue,
            };
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            *slot = Some(text);
        }

        Ok(form)
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(Pagination),
    responses(
        (status = 200, description = "One page of users", body = Page<User>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> AppResult<Json<Page<User>>> {
    let page = user_service::list_users(&state, pagination).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<User>),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<User>>> {
    let id = parse_id(&id)?;
    let resp = user_service::get_user(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body(
        content = UserPayload,
        description = "JSON body, or multipart form with the same fields plus an optional `profile_pic` file",
    ),
    responses(
        (status = 201, description = "User created", body = ApiResponse<CreatedId>),
        (status = 400, description = "email and password are required"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    form: UserForm,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    let resp = user_service::create_user(&state, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body(
        content = UserPayload,
        description = "Only supplied fields are changed; an empty string clears a name field",
    ),
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<User>),
        (status = 400, description = "Invalid ID or field"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    form: UserForm,
) -> AppResult<Json<ApiResponse<User>>> {
    let id = parse_id(&id)?;
    let resp = user_service::update_user(&state, id, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id)?;
    let resp = user_service::delete_user(&state, id).await?;
    Ok(Json(resp))
}
