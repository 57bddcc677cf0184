use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Dashboard account. Password material lives only in [`UserCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub profile_pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub client_id: i64,
    pub nom_complet: Option<String>,
    pub genre: Option<String>,
    pub age: Option<i32>,
    pub localisation: Option<String>,
    pub date_inscription: NaiveDate,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub produit_id: i64,
    pub categorie_id: Option<i64>,
    pub prix: f64,
    pub stock: i32,
    pub date_ajout: NaiveDate,
    pub nom: String,
    pub image_path: String,
    pub description: String,
}

/// Client marker for the map view.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClientLocation {
    pub client_id: i64,
    pub nom_complet: Option<String>,
    pub age: Option<i32>,
    pub localisation: Option<String>,
    pub email: Option<String>,
}

/// Best-selling product of one localisation.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TopProductByLocation {
    pub localisation: Option<String>,
    pub produit_id: i64,
    pub produit_nom: String,
    pub prix: f64,
    pub image_path: String,
    pub ventes: i64,
}
