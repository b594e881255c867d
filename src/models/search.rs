use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Projection of a post as seen by the search path.
///
/// The full content body is never loaded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchableDocument {
    pub id: Uuid,
    pub title: String,
    /// URL slug derived from the title.
    pub slug: String,
    /// Short excerpt shown in result lists.
    pub preview: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub view_count: i64,
}

/// A search hit returned to the client.
///
/// `clap_count`, `comment_count` and `average_rating` are always zero on
/// the search path. Callers must treat them as advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub document: SearchableDocument,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub clap_count: i64,
    pub comment_count: i64,
    pub average_rating: f64,
}

impl SearchResult {
    /// Wrap a document with empty metadata and zeroed engagement counters.
    pub fn bare(document: SearchableDocument) -> Self {
        Self {
            document,
            tags: Vec::new(),
            categories: Vec::new(),
            clap_count: 0,
            comment_count: 0,
            average_rating: 0.0,
        }
    }
}

/// One page of results plus the total number of matches for the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub data: Vec<SearchResult>,
    pub total_count: i64,
}

/// An autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchSuggestion {
    pub text: String,
    pub score: f64,
}

/// A query string and how often it was searched in the trending window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PopularQuery {
    pub query: String,
    pub count: i64,
}

/// Append-only record of one executed search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEvent {
    pub query: String,
    /// `None` for anonymous requesters.
    pub user_id: Option<String>,
    pub results_count: i64,
    pub created_at: DateTime<Utc>,
}

impl SearchEvent {
    /// Build an event stamped with the current time.
    ///
    /// Blank requester ids are stored as anonymous.
    pub fn new(query: impl Into<String>, user_id: Option<String>, results_count: i64) -> Self {
        Self {
            query: query.into(),
            user_id: user_id.filter(|id| !id.trim().is_empty()),
            results_count,
            created_at: Utc::now(),
        }
    }
}

/// A `(post id, name)` pair returned by the tag and category joins.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MetadataLink {
    pub post_id: Uuid,
    pub name: String,
}

/// Decoded `key=value` pairs of a query string, in order of appearance.
///
/// Endpoints extract this instead of a typed struct because a typed
/// extractor rejects repeated keys before defaults can apply.
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `key`.
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// Value of `key` when it appears exactly once. Conflicting repeats are
/// treated like any other malformed value.
fn single_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    let mut values = pairs.iter().filter(|(name, _)| name == key);
    match (values.next(), values.next()) {
        (Some((_, value)), None) => Some(value.clone()),
        _ => None,
    }
}

/// Raw query string of `GET /search/posts`.
///
/// Everything is kept as text so malformed numbers can be defaulted
/// instead of rejected.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: first_value(pairs, "q"),
            page: single_value(pairs, "page"),
            limit: single_value(pairs, "limit"),
        }
    }
}

/// Raw query string of `GET /search/suggestions`.
#[derive(Debug, Clone, Default)]
pub struct SuggestionParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl SuggestionParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: first_value(pairs, "q"),
            limit: single_value(pairs, "limit"),
        }
    }
}

/// Raw query string of `GET /search/popular`.
#[derive(Debug, Clone, Default)]
pub struct PopularParams {
    pub limit: Option<String>,
}

impl PopularParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            limit: single_value(pairs, "limit"),
        }
    }
}

/// The request payload for `POST /search/track`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackRequest {
    /// Required; validated by the handler so a missing value yields a 400.
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub results_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<SearchSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularResponse {
    pub popular_searches: Vec<PopularQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
