use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dto::{double_option, users::nullable},
    error::{AppError, AppResult},
};

/// Body of `POST /api/clients` and `PUT /api/clients/{id}`.
///
/// `date_inscription` is mandatory for both. On update the other fields
/// are only written when present; an empty string clears a text column
/// and `"age": null` clears the age.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClientPayload {
    pub nom_complet: Option<String>,
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub age: Option<Option<i32>>,
    pub localisation: Option<String>,
    pub date_inscription: Option<NaiveDate>,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct NewClient {
    pub nom_complet: Option<String>,
    pub genre: Option<String>,
    pub age: Option<i32>,
    pub localisation: Option<String>,
    pub date_inscription: NaiveDate,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct ClientChanges {
    pub nom_complet: Option<Option<String>>,
    pub genre: Option<Option<String>>,
    pub age: Option<Option<i32>>,
    pub localisation: Option<Option<String>>,
    pub date_inscription: NaiveDate,
    pub email: Option<Option<String>>,
}

impl ClientPayload {
    fn require_date(&self) -> AppResult<NaiveDate> {
        self.date_inscription
            .ok_or_else(|| AppError::missing_field("date_inscription"))
    }

    fn check_age(&self) -> AppResult<()> {
        match self.age {
            Some(Some(age)) if age < 0 => {
                Err(AppError::BadRequest("age must not be negative".into()))
            }
            _ => Ok(()),
        }
    }

    pub fn into_new_client(self) -> AppResult<NewClient> {
        let date_inscription = self.require_date()?;
        self.check_age()?;
        Ok(NewClient {
            nom_complet: nullable(self.nom_complet).flatten(),
            genre: nullable(self.genre).flatten(),
            age: self.age.flatten(),
            localisation: nullable(self.localisation).flatten(),
            date_inscription,
            email: nullable(self.email).flatten(),
        })
    }

    pub fn into_changes(self) -> AppResult<ClientChanges> {
        let date_inscription = self.require_date()?;
        self.check_age()?;
        Ok(ClientChanges {
            nom_complet: nullable(self.nom_complet),
            genre: nullable(self.genre),
            age: self.age,
            localisation: nullable(self.localisation),
            date_inscription,
            email: nullable(self.email),
        })
    }
}
