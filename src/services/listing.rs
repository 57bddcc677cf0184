use sqlx::{FromRow, postgres::PgRow};

use crate::{
    db::DbPool,
    error::AppResult,
    response::Page,
    routes::params::PageRequest,
};

/// Run a `LIMIT $1 OFFSET $2` select and its `COUNT(*)` in one
/// REPEATABLE READ snapshot so `total` matches `data`.
pub async fn fetch_page<T>(
    pool: &DbPool,
    select_sql: &str,
    count_sql: &str,
    request: &PageRequest,
) -> AppResult<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let data = sqlx::query_as::<_, T>(select_sql)
        .bind(request.limit)
        .bind(request.offset)
        .fetch_all(&mut *tx)
        .await?;

    let total: (i64,) = sqlx::query_as(count_sql).fetch_one(&mut *tx).await?;

    tx.commit().await?;

    Ok(Page::new(data, total.0, request))
}
