use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde_json::Value;

use crate::{
    analytics::AnalyticsEndpoint,
    error::AppResult,
    middleware::auth::AuthUser,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seisms", get(seisms))
        .route("/analytics/{endpoint}", get(analytics))
}

/// Query pairs for the seism catalogue, with page 1 / limit 10 unless given.
pub fn seism_query(mut query: Vec<(String, String)>) -> Vec<(String, String)> {
    for (key, default) in [("page", "1"), ("limit", "10")] {
        if !query.iter().any(|(k, _)| k == key) {
            query.push((key.to_string(), default.to_string()));
        }
    }
    query
}

#[utoipa::path(
    get,
    path = "/api/seisms",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Page size, default 10"),
    ),
    responses(
        (status = 200, description = "Seism catalogue page, relayed from the analytics service", body = serde_json::Value),
        (status = 502, description = "Analytics service unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn seisms(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<Vec<(String, String)>>,
) -> AppResult<Json<Value>> {
    let body = state
        .analytics
        .fetch(AnalyticsEndpoint::Seisms, &seism_query(query))
        .await?;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/analytics/{endpoint}",
    params(
        ("endpoint" = String, Path, description = "One of stl, predict, rfm, numbers, lstm, seisms"),
    ),
    responses(
        (status = 200, description = "Upstream JSON, unchanged", body = serde_json::Value),
        (status = 404, description = "Unknown endpoint"),
        (status = 502, description = "Analytics service unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn analytics(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(endpoint): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> AppResult<Json<Value>> {
    let endpoint: AnalyticsEndpoint = endpoint.parse()?;
    let body = state.analytics.fetch(endpoint, &query).await?;
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seism_query_fills_missing_paging() {
        let query = seism_query(vec![]);
        assert_eq!(
            query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn seism_query_keeps_caller_values() {
        let query = seism_query(vec![
            ("limit".to_string(), "500".to_string()),
            ("page".to_string(), "3".to_string()),
        ]);
        assert_eq!(query.len(), 2);
        assert!(query.contains(&("limit".to_string(), "500".to_string())));
        assert!(query.contains(&("page".to_string(), "3".to_string())));
    }
}
