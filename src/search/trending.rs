use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::db::repository::SearchStore;
use crate::error::AppError;
use crate::models::search::PopularQuery;

/// Length of the trailing window used for trending queries.
pub const TRENDING_WINDOW_DAYS: i64 = 7;

/// Most frequent queries over the trailing window, derived from the
/// analytics log. Lags behind live traffic by however recently events
/// were recorded.
pub struct TrendAggregator {
    store: Arc<dyn SearchStore>,
}

impl TrendAggregator {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    pub async fn popular(&self, limit: u32) -> Result<Vec<PopularQuery>, AppError> {
        self.popular_at(Utc::now(), limit).await
    }

    /// Same as [`Self::popular`] with an explicit "now".
    pub async fn popular_at(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<PopularQuery>, AppError> {
        let mut popular = self
            .store
            .popular_queries(window_start(now), i64::from(limit))
            .await?;

        popular.retain(|entry| !entry.query.trim().is_empty());
        popular.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        popular.truncate(limit as usize);
        Ok(popular)
    }
}

pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(TRENDING_WINDOW_DAYS)
}
