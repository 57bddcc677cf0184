use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields must be present and non-empty.
    pub fn into_credentials(self) -> AppResult<(String, String)> {
        let email = self.email.map(|e| e.trim().to_string()).unwrap_or_default();
        let password = self.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::BadRequest(
                "email and password are required".into(),
            ));
        }
        Ok((email, password))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let missing_password = LoginRequest {
            email: Some("a@b.c".into()),
            password: None,
        };
        assert!(matches!(
            missing_password.into_credentials(),
            Err(AppError::BadRequest(_))
        ));

        let blank_email = LoginRequest {
            email: Some("   ".into()),
            password: Some("pw".into()),
        };
        assert!(blank_email.into_credentials().is_err());

        let ok = LoginRequest {
            email: Some(" a@b.c ".into()),
            password: Some("pw".into()),
        };
        assert_eq!(
            ok.into_credentials().unwrap(),
            ("a@b.c".to_string(), "pw".to_string())
        );
    }
}
