pub mod cache;
pub mod catalog;
pub mod search;

pub use cache::SearchCache;
pub use catalog::{Article, Catalog, FaqEntry};
pub use search::{article_results, faq_visibility, ArticleResults, FaqVisibility, IndexedFaq};

use crate::models::SearchResponse;
use std::sync::Arc;

/// Keyword search over the FAQ list and the help article catalog.
pub struct FaqSearch {
    faq: Vec<IndexedFaq>,
    articles: Vec<Article>,
    cache: SearchCache<SearchResponse>,
}

impl FaqSearch {
    pub fn new(catalog: Catalog, cache_capacity: usize) -> Self {
        Self {
            faq: catalog.faq.into_iter().map(IndexedFaq::from).collect(),
            articles: catalog.articles,
            cache: SearchCache::new(cache_capacity),
        }
    }

    /// Results depend only on the trimmed term, so that is the cache key.
    pub fn search(&self, term: &str) -> Arc<SearchResponse> {
        let trimmed = term.trim();
        self.cache.get_or_insert_with(trimmed, || {
            tracing::debug!(term = trimmed, "computing FAQ search");
            SearchResponse {
                term: trimmed.to_string(),
                faq: faq_visibility(&self.faq, trimmed),
                articles: article_results(&self.articles, trimmed),
            }
        })
    }
}
