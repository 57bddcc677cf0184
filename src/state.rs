use std::sync::Arc;

use crate::{
    analytics::AnalyticsClient,
    config::AppConfig,
    db::{self, DbPool, OrmConn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub analytics: AnalyticsClient,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> anyhow::Result<Self> {
        let orm = db::orm_from_pool(&pool);
        let analytics =
            AnalyticsClient::new(config.analytics_url.clone(), config.analytics_timeout)?;
        Ok(Self {
            pool,
            orm,
            config: Arc::new(config),
            analytics,
        })
    }
}
