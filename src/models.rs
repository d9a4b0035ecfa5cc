use crate::services::faq::{ArticleResults, FaqVisibility};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResponse {
    pub term: String,
    pub faq: Vec<FaqVisibility>,
    pub articles: ArticleResults,
}
