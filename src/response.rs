use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::params::PageRequest;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// One page of a listing. `total` counts every row, not just this page.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: &PageRequest) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedId {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::params::Pagination;

    #[test]
    fn total_pages_rounds_up() {
        let req = Pagination { page: Some(1) }.normalize();
        assert_eq!(Page::<i32>::new(vec![], 0, &req).total_pages, 0);
        assert_eq!(Page::<i32>::new(vec![], 10, &req).total_pages, 1);
        assert_eq!(Page::<i32>::new(vec![], 11, &req).total_pages, 2);
    }

    #[test]
    fn message_only_response_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Deleted" }));
    }
}
