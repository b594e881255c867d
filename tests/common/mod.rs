#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use blog_search::app::{router, AppState};
use blog_search::db::repository::SearchStore;
use blog_search::error::AppError;
use blog_search::models::search::{
    MetadataLink, PopularQuery, SearchEvent, SearchSuggestion, SearchableDocument,
};
use blog_search::search::normalize::SearchRequest;

/// In-memory stand-in for PostgreSQL.
///
/// Text matching is a case-insensitive substring test on title and
/// preview, which is what the `ILIKE` branch of the real filter does.
#[derive(Default)]
pub struct InMemoryStore {
    pub posts: Mutex<Vec<SearchableDocument>>,
    pub tags: Mutex<Vec<MetadataLink>>,
    pub categories: Mutex<Vec<MetadataLink>>,
    pub events: Mutex<Vec<SearchEvent>>,
    /// When set, every call fails with a database error.
    pub fail_all: AtomicBool,
    /// When set, only the tag lookup fails.
    pub fail_tags: AtomicBool,
    /// When set, only analytics writes fail.
    pub fail_events: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post created `age` ago and return its id.
    pub fn add_post(&self, title: &str, preview: &str, age: Duration) -> Uuid {
        let id = Uuid::new_v4();
        self.posts.lock().unwrap().push(SearchableDocument {
            id,
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            preview: preview.to_string(),
            author_id: Uuid::new_v4(),
            created_at: Utc::now() - age,
            view_count: 0,
        });
        id
    }

    pub fn add_tag(&self, post_id: Uuid, name: &str) {
        self.tags.lock().unwrap().push(MetadataLink {
            post_id,
            name: name.to_string(),
        });
    }

    pub fn add_category(&self, post_id: Uuid, name: &str) {
        self.categories.lock().unwrap().push(MetadataLink {
            post_id,
            name: name.to_string(),
        });
    }

    /// Append an event with an explicit timestamp.
    pub fn add_event_at(&self, query: &str, created_at: DateTime<Utc>) {
        self.events.lock().unwrap().push(SearchEvent {
            query: query.to_string(),
            user_id: None,
            results_count: 0,
            created_at,
        });
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(AppError::Database("connection refused".into()));
        }
        Ok(())
    }

    fn matching(&self, text: Option<&str>) -> Vec<SearchableDocument> {
        let mut docs: Vec<SearchableDocument> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| match text {
                None => true,
                Some(text) => {
                    let needle = text.to_lowercase();
                    doc.title.to_lowercase().contains(&needle)
                        || doc.preview.to_lowercase().contains(&needle)
                }
            })
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        docs
    }

    fn links_for(links: &Mutex<Vec<MetadataLink>>, post_ids: &[Uuid]) -> Vec<MetadataLink> {
        links
            .lock()
            .unwrap()
            .iter()
            .filter(|link| post_ids.contains(&link.post_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SearchStore for InMemoryStore {
    async fn count_documents(&self, request: &SearchRequest) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.matching(request.text.as_deref()).len() as i64)
    }

    async fn fetch_documents(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchableDocument>, AppError> {
        self.check()?;
        Ok(self
            .matching(request.text.as_deref())
            .into_iter()
            .skip(request.pagination.offset() as usize)
            .take(request.pagination.limit() as usize)
            .collect())
    }

    async fn fetch_categories(&self, post_ids: &[Uuid]) -> Result<Vec<MetadataLink>, AppError> {
        self.check()?;
        Ok(Self::links_for(&self.categories, post_ids))
    }

    async fn fetch_tags(&self, post_ids: &[Uuid]) -> Result<Vec<MetadataLink>, AppError> {
        self.check()?;
        if self.fail_tags.load(Ordering::SeqCst) {
            return Err(AppError::Database("tag join failed".into()));
        }
        Ok(Self::links_for(&self.tags, post_ids))
    }

    async fn match_titles(
        &self,
        partial: &str,
        _limit: i64,
    ) -> Result<Vec<SearchSuggestion>, AppError> {
        self.check()?;
        let needle = partial.to_lowercase();
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter_map(|doc| {
                let title = doc.title.to_lowercase();
                let score = if title.starts_with(&needle) {
                    1.0
                } else if title.contains(&needle) {
                    0.5
                } else {
                    return None;
                };
                Some(SearchSuggestion {
                    text: doc.title.clone(),
                    score,
                })
            })
            .collect())
    }

    async fn insert_event(&self, event: &SearchEvent) -> Result<(), AppError> {
        self.check()?;
        if self.fail_events.load(Ordering::SeqCst) {
            return Err(AppError::Database("analytics table is read-only".into()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn popular_queries(
        &self,
        since: DateTime<Utc>,
        _limit: i64,
    ) -> Result<Vec<PopularQuery>, AppError> {
        self.check()?;
        let mut counts: HashMap<String, i64> = HashMap::new();
        for event in self.events.lock().unwrap().iter() {
            if event.created_at >= since {
                *counts.entry(event.query.clone()).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(query, count)| PopularQuery { query, count })
            .collect())
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Router wired to an in-memory store, plus direct access to that store.
pub struct TestEnv {
    pub store: Arc<InMemoryStore>,
    pub router: axum::Router,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_tracking(true)
    }

    pub fn with_tracking(track_search_requests: bool) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(store.clone(), track_search_requests);
        Self {
            router: router(state),
            store,
        }
    }

    /// The three posts used by most scenarios, newest first:
    /// "Go Basics", "Rust Patterns", "Intro to Rust".
    pub fn seed_blog(&self) -> (Uuid, Uuid, Uuid) {
        let intro = self.store.add_post(
            "Intro to Rust",
            "Ownership and borrowing for beginners.",
            Duration::hours(3),
        );
        let patterns = self.store.add_post(
            "Rust Patterns",
            "Builders, newtypes and typestate.",
            Duration::hours(2),
        );
        let go = self.store.add_post(
            "Go Basics",
            "Goroutines and channels.",
            Duration::hours(1),
        );
        (intro, patterns, go)
    }

    /// Build a `TestServer` that does NOT expect success by default.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }
}
