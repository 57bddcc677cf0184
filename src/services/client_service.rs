use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::{
    dto::clients::ClientPayload,
    entity::clients::{ActiveModel, Entity as Clients, Model as ClientModel},
    error::{AppError, AppResult},
    models::{Client, ClientLocation},
    response::{ApiResponse, CreatedId, Page},
    routes::params::Pagination,
    services::listing::fetch_page,
    state::AppState,
};

pub async fn list_clients(state: &AppState, pagination: Pagination) -> AppResult<Page<Client>> {
    let request = pagination.normalize();
    fetch_page(
        &state.pool,
        "SELECT * FROM client ORDER BY date_inscription DESC, client_id DESC LIMIT $1 OFFSET $2",
        "SELECT COUNT(*) FROM client",
        &request,
    )
    .await
}

pub async fn get_client(state: &AppState, id: i64) -> AppResult<ApiResponse<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM client WHERE client_id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let client = match client {
        Some(c) => c,
        None => return Err(AppError::not_found("Client")),
    };
    Ok(ApiResponse::success("Client", client))
}

pub async fn create_client(
    state: &AppState,
    payload: ClientPayload,
) -> AppResult<ApiResponse<CreatedId>> {
    let client = payload.into_new_client()?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO client (nom_complet, genre, age, localisation, date_inscription, email)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING client_id
        "#,
    )
    .bind(client.nom_complet)
    .bind(client.genre)
    .bind(client.age)
    .bind(client.localisation)
    .bind(client.date_inscription)
    .bind(client.email)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(client_id = id, "client created");
    Ok(ApiResponse::success("Client created", CreatedId { id }))
}

pub async fn update_client(
    state: &AppState,
    id: i64,
    payload: ClientPayload,
) -> AppResult<ApiResponse<Client>> {
    let changes = payload.into_changes()?;

    let existing = Clients::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::not_found("Client")),
    };

    // date_inscription is always written, so the row is always updated
    let mut active: ActiveModel = existing.into();
    active.date_inscription = Set(changes.date_inscription);
    if let Some(nom_complet) = changes.nom_complet {
        active.nom_complet = Set(nom_complet);
    }
    if let Some(genre) = changes.genre {
        active.genre = Set(genre);
    }
    if let Some(age) = changes.age {
        active.age = Set(age);
    }
    if let Some(localisation) = changes.localisation {
        active.localisation = Set(localisation);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }

    let client = active.update(&state.orm).await?;
    tracing::info!(client_id = id, "client updated");

    Ok(ApiResponse::success("Updated", client_from_entity(client)))
}

pub async fn delete_client(state: &AppState, id: i64) -> AppResult<ApiResponse<()>> {
    let result = sqlx::query("DELETE FROM client WHERE client_id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Client"));
    }

    tracing::info!(client_id = id, "client deleted");
    Ok(ApiResponse::message("Client deleted"))
}

/// Every client as a map marker.
pub async fn client_locations(state: &AppState) -> AppResult<Vec<ClientLocation>> {
    let rows = sqlx::query_as::<_, ClientLocation>(
        "SELECT client_id, nom_complet, age, localisation, email FROM client ORDER BY client_id",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(rows)
}

fn client_from_entity(model: ClientModel) -> Client {
    Client {
        client_id: model.client_id,
        nom_complet: model.nom_complet,
        genre: model.genre,
        age: model.age,
        localisation: model.localisation,
        date_inscription: model.date_inscription,
        email: model.email,
    }
}
