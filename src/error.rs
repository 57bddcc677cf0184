use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

// Postgres SQLSTATE codes surfaced as 409.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Analytics service unavailable: {0}")]
    Upstream(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{entity} not found"))
    }

    pub fn missing_field(field: &str) -> Self {
        AppError::BadRequest(format!("{field} is required"))
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Map constraint violations to 409 so they never leak as opaque 500s.
    fn classify_db(self) -> Self {
        let code = match &self {
            AppError::DbError(e) => e
                .as_database_error()
                .and_then(|db| db.code())
                .map(|c| c.into_owned()),
            AppError::OrmError(sea_orm::DbErr::Exec(sea_orm::RuntimeErr::SqlxError(e)))
            | AppError::OrmError(sea_orm::DbErr::Query(sea_orm::RuntimeErr::SqlxError(e))) => e
                .as_database_error()
                .and_then(|db| db.code())
                .map(|c| c.into_owned()),
            _ => None,
        };
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => AppError::Conflict("Resource already exists".into()),
            Some(FOREIGN_KEY_VIOLATION) => {
                AppError::Conflict("Resource is referenced by other records".into())
            }
            _ => self,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let this = self.classify_db();
        let status = this.status();

        match &this {
            AppError::DbError(e) => tracing::error!(error = ?e, "database error"),
            AppError::OrmError(e) => tracing::error!(error = ?e, "orm error"),
            AppError::Internal(e) => tracing::error!(error = ?e, "internal error"),
            AppError::Upstream(e) => tracing::warn!(error = %e, "analytics upstream error"),
            _ => {}
        }

        let body = ErrorBody {
            message: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            error: this.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AppError::missing_field("email").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::not_found("Client").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unauthorized("nope".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Upstream("down".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::DbError(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_errors_are_not_echoed() {
        let err = AppError::DbError(sqlx::Error::Protocol("secret detail".into()));
        assert_eq!(err.to_string(), "Database error");
    }

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(AppError::missing_field("email").to_string(), "email is required");
        assert_eq!(AppError::not_found("Product").to_string(), "Product not found");
    }
}
