use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::db::repository::SearchStore;
use crate::error::AppError;
use crate::models::search::{MetadataLink, SearchResult, SearchableDocument};

/// Attaches tag and category names to a page of documents.
///
/// Metadata is fetched for the whole page at once: one set-membership
/// query for categories and one for tags. A failed lookup is logged and
/// leaves the corresponding field empty instead of failing the page.
pub struct MetadataEnricher {
    store: Arc<dyn SearchStore>,
}

impl MetadataEnricher {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    pub async fn enrich(&self, documents: Vec<SearchableDocument>) -> Vec<SearchResult> {
        if documents.is_empty() {
            return Vec::new();
        }

        let ids: Vec<Uuid> = documents.iter().map(|doc| doc.id).collect();
        let (categories, tags) = tokio::join!(
            self.store.fetch_categories(&ids),
            self.store.fetch_tags(&ids)
        );
        let mut categories = group_names(categories, "categories");
        let mut tags = group_names(tags, "tags");

        documents
            .into_iter()
            .map(|document| {
                let id = document.id;
                let mut result = SearchResult::bare(document);
                result.categories = categories.remove(&id).unwrap_or_default();
                result.tags = tags.remove(&id).unwrap_or_default();
                result
            })
            .collect()
    }
}

fn group_names(
    links: Result<Vec<MetadataLink>, AppError>,
    kind: &str,
) -> HashMap<Uuid, Vec<String>> {
    let links = match links {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!("Failed to resolve {kind} for search results: {e}");
            return HashMap::new();
        }
    };

    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for link in links {
        grouped.entry(link.post_id).or_default().push(link.name);
    }
    grouped
}
