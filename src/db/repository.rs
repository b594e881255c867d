use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::queries;
use crate::error::AppError;
use crate::models::search::{
    MetadataLink, PopularQuery, SearchEvent, SearchSuggestion, SearchableDocument,
};
use crate::search::normalize::SearchRequest;

/// Repository trait for everything the search core reads and writes.
///
/// Components receive an `Arc<dyn SearchStore>` at construction, so tests
/// can swap the database for an in-memory implementation or a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Count posts matching the request's text filter. Pagination is ignored.
    async fn count_documents(&self, request: &SearchRequest) -> Result<i64, AppError>;

    /// Fetch one page of matching posts, newest first.
    async fn fetch_documents(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchableDocument>, AppError>;

    /// Category names linked to any of the given posts.
    async fn fetch_categories(&self, post_ids: &[Uuid]) -> Result<Vec<MetadataLink>, AppError>;

    /// Tag names linked to any of the given posts.
    async fn fetch_tags(&self, post_ids: &[Uuid]) -> Result<Vec<MetadataLink>, AppError>;

    /// Scored titles matching a non-empty partial query.
    async fn match_titles(
        &self,
        partial: &str,
        limit: i64,
    ) -> Result<Vec<SearchSuggestion>, AppError>;

    /// Append one analytics event.
    async fn insert_event(&self, event: &SearchEvent) -> Result<(), AppError>;

    /// Query counts for events logged at or after `since`.
    async fn popular_queries(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PopularQuery>, AppError>;

    /// Create the analytics table and search indexes if they are missing.
    async fn ensure_schema(&self) -> Result<(), AppError>;
}

/// PostgreSQL implementation of the SearchStore.
pub struct PgSearchStore {
    pool: sqlx::PgPool,
}

impl PgSearchStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {e}")))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SearchStore for PgSearchStore {
    async fn count_documents(&self, request: &SearchRequest) -> Result<i64, AppError> {
        let mut builder = queries::count_query(request.text.as_deref());

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn fetch_documents(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchableDocument>, AppError> {
        let mut builder = queries::page_query(request.text.as_deref(), &request.pagination);

        builder
            .build_query_as::<SearchableDocument>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn fetch_categories(&self, post_ids: &[Uuid]) -> Result<Vec<MetadataLink>, AppError> {
        let mut builder = queries::categories_query(post_ids);

        builder
            .build_query_as::<MetadataLink>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn fetch_tags(&self, post_ids: &[Uuid]) -> Result<Vec<MetadataLink>, AppError> {
        let mut builder = queries::tags_query(post_ids);

        builder
            .build_query_as::<MetadataLink>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn match_titles(
        &self,
        partial: &str,
        limit: i64,
    ) -> Result<Vec<SearchSuggestion>, AppError> {
        let mut builder = queries::suggestion_query(partial, limit);

        builder
            .build_query_as::<SearchSuggestion>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_event(&self, event: &SearchEvent) -> Result<(), AppError> {
        let mut builder = queries::insert_event_query(event);

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn popular_queries(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PopularQuery>, AppError> {
        let mut builder = queries::popular_query(since, limit);

        builder
            .build_query_as::<PopularQuery>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        for statement in crate::db::schema::setup_statements() {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("Schema setup failed: {e}")))?;
        }

        tracing::info!("Search schema is up to date");
        Ok(())
    }
}
