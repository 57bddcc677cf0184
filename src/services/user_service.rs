use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::{
    db::DbPool,
    dto::users::UserForm,
    entity::users::{ActiveModel, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, CreatedId, Page},
    routes::params::Pagination,
    services::{auth_service::hash_password, listing::fetch_page},
    state::AppState,
    upload::store_upload,
};

/// Every column except the password hash.
pub const USER_COLUMNS: &str =
    "id, email, first_name, last_name, username, profile_pic, created_at";

pub async fn list_users(state: &AppState, pagination: Pagination) -> AppResult<Page<User>> {
    let request = pagination.normalize();
    let select = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
    fetch_page(&state.pool, &select, "SELECT COUNT(*) FROM users", &request).await
}

pub async fn find_user(pool: &DbPool, id: i64) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    user.ok_or_else(|| AppError::not_found("User"))
}

pub async fn get_user(state: &AppState, id: i64) -> AppResult<ApiResponse<User>> {
    let user = find_user(&state.pool, id).await?;
    Ok(ApiResponse::success("User", user))
}

pub async fn create_user(state: &AppState, form: UserForm) -> AppResult<ApiResponse<CreatedId>> {
    let new_user = form.fields.into_new_user()?;
    let password_hash = hash_password(new_user.password.clone()).await?;

    let profile_pic = match &form.profile_pic {
        Some(file) if !file.is_empty() => Some(store_upload(&state.config.upload_dir, file).await?),
        _ => None,
    };

    let inserted: Result<(i64,), sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO users (email, first_name, last_name, username, password_hash, profile_pic)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&new_user.email)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.username)
    .bind(password_hash)
    .bind(&profile_pic)
    .fetch_one(&state.pool)
    .await;

    let (id,) = match inserted {
        Ok(row) => row,
        Err(err) => {
            if let Some(path) = &profile_pic {
                discard_upload(state, path).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(user_id = id, "user created");
    Ok(ApiResponse::success("User created", CreatedId { id }))
}

pub async fn update_user(
    state: &AppState,
    id: i64,
    form: UserForm,
) -> AppResult<ApiResponse<User>> {
    let changes = form.fields.into_changes()?;

    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::not_found("User")),
    };

    let mut active: ActiveModel = existing.clone().into();
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    if let Some(first_name) = changes.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(username) = changes.username {
        active.username = Set(username);
    }
    if let Some(password) = changes.password {
        active.password_hash = Set(hash_password(password).await?);
    }
    let new_pic = match form.profile_pic.as_ref().filter(|f| !f.is_empty()) {
        Some(file) => {
            let path = store_upload(&state.config.upload_dir, file).await?;
            active.profile_pic = Set(Some(path.clone()));
            Some(path)
        }
        None => None,
    };

    if !active.is_changed() {
        return Ok(ApiResponse::success("Updated", user_from_entity(existing)));
    }

    let user = match active.update(&state.orm).await {
        Ok(user) => user,
        Err(err) => {
            if let Some(path) = &new_pic {
                discard_upload(state, path).await;
            }
            return Err(err.into());
        }
    };
    tracing::info!(user_id = id, "user updated");

    // the replaced picture is no longer referenced
    if new_pic.is_some() {
        if let Some(old) = existing.profile_pic.as_deref() {
            discard_upload(state, old).await;
        }
    }

    Ok(ApiResponse::success("Updated", user_from_entity(user)))
}

pub async fn delete_user(state: &AppState, id: i64) -> AppResult<ApiResponse<()>> {
    let deleted: Option<(Option<String>,)> =
        sqlx::query_as("DELETE FROM users WHERE id = $1 RETURNING profile_pic")
            .bind(id)
            .fetch_optional(&state.pool)
            .await?;

    let Some((profile_pic,)) = deleted else {
        return Err(AppError::not_found("User"));
    };
    if let Some(path) = profile_pic.as_deref() {
        discard_upload(state, path).await;
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(ApiResponse::message("User deleted"))
}

async fn discard_upload(state: &AppState, public_path: &str) {
    let Some(name) = public_path.rsplit('/').next() else {
        return;
    };
    if let Err(err) = tokio::fs::remove_file(state.config.upload_dir.join(name)).await {
        tracing::warn!(error = %err, path = public_path, "failed to remove orphan upload");
    }
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        username: model.username,
        profile_pic: model.profile_pic,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
