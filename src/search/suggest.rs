use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::SearchStore;
use crate::error::AppError;
use crate::models::search::SearchSuggestion;
use crate::search::normalize::normalize_text;

/// Title completions for a partial query.
pub struct SuggestionEngine {
    store: Arc<dyn SearchStore>,
}

impl SuggestionEngine {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` distinct titles, best score first.
    ///
    /// A blank query returns an empty list without touching the store.
    pub async fn suggest(
        &self,
        partial: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SearchSuggestion>, AppError> {
        let Some(partial) = normalize_text(partial) else {
            return Ok(Vec::new());
        };

        let candidates = self.store.match_titles(&partial, i64::from(limit)).await?;
        Ok(rank_suggestions(candidates, limit as usize))
    }
}

/// Deduplicate by exact text (keeping the best score), then order by score
/// descending with a lexicographic tie-break, then truncate.
pub fn rank_suggestions(candidates: Vec<SearchSuggestion>, limit: usize) -> Vec<SearchSuggestion> {
    let mut best: HashMap<String, f64> = HashMap::new();
    for candidate in candidates {
        let score = if candidate.score.is_nan() {
            0.0
        } else {
            candidate.score
        };
        best.entry(candidate.text)
            .and_modify(|existing| *existing = existing.max(score))
            .or_insert(score);
    }

    let mut ranked: Vec<SearchSuggestion> = best
        .into_iter()
        .map(|(text, score)| SearchSuggestion { text, score })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.text.cmp(&b.text))
    });
    ranked.truncate(limit);
    ranked
}
