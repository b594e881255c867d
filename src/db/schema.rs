use crate::db::queries::LEXICAL_VECTOR;

/// Idempotent schema setup for the search path.
///
/// The `posts`, `tags` and `categories` tables belong to the content store
/// and must already exist. Only the analytics table and the indexes are
/// created here, each guarded by `IF NOT EXISTS`.
pub fn setup_statements() -> Vec<String> {
    vec![
        "CREATE TABLE IF NOT EXISTS search_analytics (\
            id BIGSERIAL PRIMARY KEY, \
            query TEXT NOT NULL, \
            user_id TEXT, \
            results_count INTEGER NOT NULL DEFAULT 0, \
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW())"
            .to_string(),
        "CREATE INDEX IF NOT EXISTS idx_search_analytics_created_at \
            ON search_analytics (created_at DESC)"
            .to_string(),
        "CREATE INDEX IF NOT EXISTS idx_search_analytics_query ON search_analytics (query)"
            .to_string(),
        format!("CREATE INDEX IF NOT EXISTS idx_posts_search_vector ON posts USING GIN ({LEXICAL_VECTOR})"),
        "CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts (created_at DESC)".to_string(),
        "CREATE INDEX IF NOT EXISTS idx_posts_view_count ON posts (view_count DESC)".to_string(),
        "CREATE INDEX IF NOT EXISTS idx_posts_author_id ON posts (author_id)".to_string(),
    ]
}
