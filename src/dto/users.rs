use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    upload::UploadedFile,
};

/// Text fields of a user, sent as JSON or as multipart form fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserPayload {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// A user payload plus the optional `profile_pic` file part.
#[derive(Debug, Default)]
pub struct UserForm {
    pub fields: UserPayload,
    pub profile_pic: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Partial update. `None` leaves a column untouched, `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub username: Option<Option<String>>,
    pub password: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn nullable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let v = v.trim().to_string();
        if v.is_empty() { None } else { Some(v) }
    })
}

impl UserPayload {
    pub fn into_new_user(self) -> AppResult<NewUser> {
        let email = present(self.email);
        // passwords are not trimmed, only checked for emptiness
        let password = self.password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AppError::BadRequest(
                "email and password are required".into(),
            ));
        };
        Ok(NewUser {
            email,
            password,
            first_name: present(self.first_name),
            last_name: present(self.last_name),
            username: present(self.username),
        })
    }

    pub fn into_changes(self) -> AppResult<UserChanges> {
        let email = match self.email {
            Some(email) => match present(Some(email)) {
                Some(email) => Some(email),
                None => return Err(AppError::BadRequest("email must not be empty".into())),
            },
            None => None,
        };
        Ok(UserChanges {
            email,
            first_name: nullable(self.first_name),
            last_name: nullable(self.last_name),
            username: nullable(self.username),
            password: self.password.filter(|p| !p.is_empty()),
        })
    }
}
