//! SQL assembly for the search path.
//!
//! Every query is built with [`QueryBuilder`] and user input is only ever
//! bound, never spliced into the SQL text.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::search::SearchEvent;
use crate::search::normalize::Pagination;

/// Lexical vector over title and preview.
///
/// Must stay byte-identical to the expression of the GIN index created in
/// [`crate::db::schema`] so the planner can use it.
pub const LEXICAL_VECTOR: &str =
    "to_tsvector('english', coalesce(title, '') || ' ' || coalesce(preview, ''))";

const DOCUMENT_COLUMNS: &str = "id, title, slug, coalesce(preview, '') AS preview, \
     author_id, created_at, view_count::bigint AS view_count";

/// Escape `%`, `_` and `\` so user text is matched literally by `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `ILIKE` pattern matching `text` anywhere.
pub fn contains_pattern(text: &str) -> String {
    format!("%{}%", escape_like(text))
}

/// `ILIKE` pattern matching `text` at the start.
pub fn prefix_pattern(text: &str) -> String {
    format!("{}%", escape_like(text))
}

/// Append the disjunctive text filter, or nothing when `text` is `None`.
///
/// A row matches when the lexical vector matches the query, or when the
/// title or preview contains it as a substring.
pub fn push_text_filter(builder: &mut QueryBuilder<'static, Postgres>, text: Option<&str>) {
    let Some(text) = text else {
        return;
    };
    let pattern = contains_pattern(text);

    builder
        .push(" WHERE (")
        .push(LEXICAL_VECTOR)
        .push(" @@ plainto_tsquery('english', ")
        .push_bind(text.to_string())
        .push(") OR title ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR preview ILIKE ")
        .push_bind(pattern)
        .push(")");
}

/// One page of matching posts, newest first.
pub fn page_query(text: Option<&str>, pagination: &Pagination) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {DOCUMENT_COLUMNS} FROM posts"));
    push_text_filter(&mut builder, text);
    builder
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(pagination.limit())
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    builder
}

/// Number of posts matching the same filter as [`page_query`].
pub fn count_query(text: Option<&str>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM posts");
    push_text_filter(&mut builder, text);
    builder
}

pub fn categories_query(post_ids: &[Uuid]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT pc.post_id, c.name FROM post_categories pc \
         JOIN categories c ON c.id = pc.category_id \
         WHERE pc.post_id = ANY(",
    );
    builder.push_bind(post_ids.to_vec()).push(")");
    builder
}

pub fn tags_query(post_ids: &[Uuid]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT pt.post_id, t.name FROM post_tags pt \
         JOIN tags t ON t.id = pt.tag_id \
         WHERE pt.post_id = ANY(",
    );
    builder.push_bind(post_ids.to_vec()).push(")");
    builder
}

/// Distinct titles matching a partial query, with a relevance score.
///
/// Score is the lexical rank of the title plus a containment bonus:
/// 1.0 for a prefix match, 0.5 for a match anywhere else. Ties are broken
/// in byte order so the rows kept by `LIMIT` agree with the in-process sort.
pub fn suggestion_query(partial: &str, limit: i64) -> QueryBuilder<'static, Postgres> {
    let contains = contains_pattern(partial);

    let mut builder = QueryBuilder::new(
        "SELECT title AS text, \
         MAX(ts_rank(to_tsvector('english', title), plainto_tsquery('english', ",
    );
    builder
        .push_bind(partial.to_string())
        .push(")))::float8 + CASE WHEN title ILIKE ")
        .push_bind(prefix_pattern(partial))
        .push(" THEN 1.0 WHEN title ILIKE ")
        .push_bind(contains.clone())
        .push(" THEN 0.5 ELSE 0.0 END::float8 AS score FROM posts WHERE title ILIKE ")
        .push_bind(contains)
        .push(" OR to_tsvector('english', title) @@ plainto_tsquery('english', ")
        .push_bind(partial.to_string())
        .push(") GROUP BY title ORDER BY score DESC, title COLLATE \"C\" ASC LIMIT ")
        .push_bind(limit);
    builder
}

/// Most frequent non-blank queries logged at or after `since`.
pub fn popular_query(since: DateTime<Utc>, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT query, COUNT(*) AS count FROM search_analytics WHERE created_at >= ",
    );
    builder
        .push_bind(since)
        .push(" AND btrim(query) <> '' GROUP BY query ORDER BY count DESC, query COLLATE \"C\" ASC LIMIT ")
        .push_bind(limit);
    builder
}

pub fn insert_event_query(event: &SearchEvent) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "INSERT INTO search_analytics (query, user_id, results_count, created_at) ",
    );
    builder.push_values(std::iter::once(event.clone()), |mut row, event| {
        row.push_bind(event.query)
            .push_bind(event.user_id)
            .push_bind(i32::try_from(event.results_count).unwrap_or(i32::MAX))
            .push_bind(event.created_at);
    });
    builder
}
