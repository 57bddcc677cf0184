use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Listings use a fixed page size.
pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// 1-based page number, default 1.
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn normalize(&self) -> PageRequest {
        let page = self.page.unwrap_or(1).max(1);
        let limit = PAGE_SIZE;
        let offset = (page - 1).saturating_mul(limit);
        PageRequest {
            page,
            limit,
            offset,
        }
    }
}

/// Path ids arrive as text so a non-numeric id is a 400 with our own body.
pub fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest("Invalid ID".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_follows_page() {
        for page in 1..=50 {
            let req = Pagination { page: Some(page) }.normalize();
            assert_eq!(req.offset, (page - 1) * 10);
            assert_eq!(req.limit, 10);
        }
    }

    #[test]
    fn missing_or_non_positive_page_is_first_page() {
        assert_eq!(Pagination::default().normalize().page, 1);
        assert_eq!(Pagination { page: Some(0) }.normalize().offset, 0);
        assert_eq!(Pagination { page: Some(-4) }.normalize().page, 1);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let req = Pagination {
            page: Some(i64::MAX),
        }
        .normalize();
        assert_eq!(req.offset, i64::MAX);
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("1.5"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id(""), Err(AppError::BadRequest(_))));
    }
}
