use super::catalog::{Article, FaqEntry};
use serde::Serialize;

/// Terms shorter than this (after trimming) do not filter anything.
pub const MIN_TERM_LENGTH: usize = 2;

pub const PROMPT_MESSAGE: &str = "Start typing to see suggested guides and tutorials.";
pub const NO_MATCHES_MESSAGE: &str = "No related guides found. Try different keywords.";

/// An FAQ entry with its lowercased search text precomputed.
#[derive(Debug, Clone)]
pub struct IndexedFaq {
    pub entry: FaqEntry,
    content: String,
}

impl From<FaqEntry> for IndexedFaq {
    fn from(entry: FaqEntry) -> Self {
        let content = entry.search_text();
        Self { entry, content }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FaqVisibility {
    pub id: String,
    pub question: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArticleResults {
    Prompt { message: &'static str },
    NoMatches { message: &'static str },
    Matches { items: Vec<Article> },
}

fn is_too_short(term: &str) -> bool {
    term.chars().count() < MIN_TERM_LENGTH
}

pub fn faq_visibility(entries: &[IndexedFaq], term: &str) -> Vec<FaqVisibility> {
    let normalized = term.trim().to_lowercase();
    let show_all = is_too_short(&normalized);

    entries
        .iter()
        .map(|indexed| FaqVisibility {
            id: indexed.entry.id.clone(),
            question: indexed.entry.question.clone(),
            visible: show_all || indexed.content.contains(&normalized),
        })
        .collect()
}

fn article_matches(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article.description.to_lowercase().contains(needle)
        || article.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

pub fn article_results(articles: &[Article], term: &str) -> ArticleResults {
    let trimmed = term.trim();
    if is_too_short(trimmed) {
        return ArticleResults::Prompt {
            message: PROMPT_MESSAGE,
        };
    }

    let needle = trimmed.to_lowercase();
    let items: Vec<Article> = articles
        .iter()
        .filter(|article| article_matches(article, &needle))
        .cloned()
        .collect();

    if items.is_empty() {
        ArticleResults::NoMatches {
            message: NO_MATCHES_MESSAGE,
        }
    } else {
        ArticleResults::Matches { items }
    }
}
