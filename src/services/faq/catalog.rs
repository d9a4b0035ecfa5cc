use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../../data/faq_catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    /// Text the search term is matched against.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.question, self.answer).to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw).map_err(|e| AppError::Catalog(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// The configured catalog file, or the compiled-in one when none is set.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let catalog = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::builtin()?,
        };
        tracing::info!(
            "Loaded FAQ catalog with {} entries and {} articles",
            catalog.faq.len(),
            catalog.articles.len()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.articles.len(), 6);
        assert!(!catalog.faq.is_empty());
        assert_eq!(catalog.articles[0].title, "CPNW Requirements Checklist");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let catalog = Catalog::from_json(r#"{"faq": []}"#).unwrap();
        assert!(catalog.articles.is_empty());
    }

    #[test]
    fn malformed_json_is_a_catalog_error() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(AppError::Catalog(_))
        ));
    }

    #[test]
    fn unreadable_path_names_the_file() {
        let err = Catalog::from_path(Path::new("/nonexistent/faq.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/faq.json"));
    }
}
