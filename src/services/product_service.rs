use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::products::{ActiveModel, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::{Product, TopProductByLocation},
    response::{ApiResponse, CreatedId, Page},
    routes::params::Pagination,
    services::listing::fetch_page,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<Page<Product>> {
    let request = pagination.normalize();
    fetch_page(
        &state.pool,
        "SELECT * FROM produit ORDER BY date_ajout DESC, produit_id DESC LIMIT $1 OFFSET $2",
        "SELECT COUNT(*) FROM produit",
        &request,
    )
    .await
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    let result = sqlx::query_as::<_, Product>("SELECT * FROM produit WHERE produit_id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::not_found("Product")),
    };
    Ok(ApiResponse::success("Product", result))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<CreatedId>> {
    let product = payload.validate()?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO produit (categorie_id, prix, stock, date_ajout, nom, image_path, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING produit_id
        "#,
    )
    .bind(product.categorie_id)
    .bind(product.prix)
    .bind(product.stock)
    .bind(product.date_ajout)
    .bind(product.nom)
    .bind(product.image_path)
    .bind(product.description)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(produit_id = id, "product created");
    Ok(ApiResponse::success("Product created", CreatedId { id }))
}

pub async fn update_product(
    state: &AppState,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let payload = payload.validate()?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::not_found("Product")),
    };

    let mut active: ActiveModel = existing.clone().into();
    if let Some(categorie_id) = payload.categorie_id {
        active.categorie_id = Set(categorie_id);
    }
    if let Some(prix) = payload.prix {
        active.prix = Set(prix);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(date_ajout) = payload.date_ajout {
        active.date_ajout = Set(date_ajout);
    }
    if let Some(nom) = payload.nom {
        active.nom = Set(nom.trim().to_string());
    }
    if let Some(image_path) = payload.image_path {
        active.image_path = Set(image_path);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }

    if !active.is_changed() {
        return Ok(ApiResponse::success("Updated", product_from_entity(existing)));
    }

    let product = active.update(&state.orm).await?;
    tracing::info!(produit_id = id, "product updated");

    Ok(ApiResponse::success("Updated", product_from_entity(product)))
}

pub async fn delete_product(state: &AppState, id: i64) -> AppResult<ApiResponse<()>> {
    let result = sqlx::query("DELETE FROM produit WHERE produit_id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product"));
    }

    tracing::info!(produit_id = id, "product deleted");
    Ok(ApiResponse::message("Product deleted"))
}

/// Unpaginated catalogue, oldest first, for selection lists.
pub async fn all_products(state: &AppState) -> AppResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>("SELECT * FROM produit ORDER BY date_ajout, produit_id")
        .fetch_all(&state.pool)
        .await?;
    Ok(rows)
}

/// Products with the most transactions in each client localisation. Ties are all kept.
pub async fn top_products_by_location(state: &AppState) -> AppResult<Vec<TopProductByLocation>> {
    let rows = sqlx::query_as::<_, TopProductByLocation>(
        r#"
        WITH ventes AS (
            SELECT
                c.localisation,
                p.produit_id,
                p.nom AS produit_nom,
                p.prix,
                p.image_path,
                COUNT(t.transaction_id) AS ventes
            FROM transactions t
            JOIN client c ON t.client_id = c.client_id
            JOIN produit p ON t.produit_id = p.produit_id
            GROUP BY c.localisation, p.produit_id, p.nom, p.prix, p.image_path
        ),
        ranked AS (
            SELECT *, RANK() OVER (PARTITION BY localisation ORDER BY ventes DESC) AS rang
            FROM ventes
        )
        SELECT localisation, produit_id, produit_nom, prix, image_path, ventes
        FROM ranked
        WHERE rang = 1
        ORDER BY localisation, ventes DESC, produit_id
        "#,
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(rows)
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        produit_id: model.produit_id,
        categorie_id: model.categorie_id,
        prix: model.prix,
        stock: model.stock,
        date_ajout: model.date_ajout,
        nom: model.nom,
        image_path: model.image_path,
        description: model.description,
    }
}
