// src/crawler/config.rs
use crate::extractors::{dom::parse_selector, documents::default_extensions};
use crate::utils::error::ExtractError;
use scraper::Selector;
use url::Url;

pub const INDEX_URL: &str = "http://www.sgg.ro/legislativ/index.php/";
pub const DEFAULT_INSTITUTION: &str = "sgg";
/// Substring of a link that marks it as a category page.
pub const CATEGORY_MARKER: &str = "domeniu.php";
// Direct rows only; html5ever wraps them in an implicit tbody
pub const ROW_SELECTOR: &str = "table.fancy > tr, table.fancy > tbody > tr";
pub const PAGINATION_SELECTOR: &str = ".pagination";

/// 1-based column positions of the publication table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub title: usize,
    pub kind: usize,
    pub consultation: usize,
    pub review_procedure: usize,
    pub reviewers: usize,
    pub review_deadline: usize,
    pub ministry_review: usize,
    pub re_review_deadline: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            title: 1,
            kind: 2,
            consultation: 3,
            review_procedure: 4,
            reviewers: 5,
            review_deadline: 6,
            ministry_review: 7,
            re_review_deadline: 8,
        }
    }
}

/// Everything the extraction pipeline needs to know about the target site.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub index_url: Url,
    /// Stored in every record's `institution` field
    pub institution: String,
    pub category_marker: String,
    pub document_extensions: Vec<String>,
    pub columns: ColumnLayout,
    pub row_selector: Selector,
    pub pagination_selector: Selector,
}

impl CrawlConfig {
    pub fn new(index_url: Url) -> Result<Self, ExtractError> {
        Ok(Self {
            index_url,
            institution: DEFAULT_INSTITUTION.to_string(),
            category_marker: CATEGORY_MARKER.to_string(),
            document_extensions: default_extensions(),
            columns: ColumnLayout::default(),
            row_selector: parse_selector(ROW_SELECTOR)?,
            pagination_selector: parse_selector(PAGINATION_SELECTOR)?,
        })
    }

    pub fn from_index(index_url: &str) -> Result<Self, ExtractError> {
        let url = Url::parse(index_url)
            .map_err(|e| ExtractError::InvalidUrl(format!("{}: {}", index_url, e)))?;
        Self::new(url)
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = institution.into();
        self
    }

    pub fn with_category_marker(mut self, marker: impl Into<String>) -> Self {
        self.category_marker = marker.into();
        self
    }

    pub fn with_pagination_selector(mut self, css: &str) -> Result<Self, ExtractError> {
        self.pagination_selector = parse_selector(css)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::from_index(INDEX_URL).unwrap();
        assert_eq!(config.institution, "sgg");
        assert_eq!(config.category_marker, "domeniu.php");
        assert_eq!(config.document_extensions.len(), 9);
        assert_eq!(config.columns.title, 1);
        assert_eq!(config.columns.re_review_deadline, 8);
    }

    #[test]
    fn test_overrides() {
        let config = CrawlConfig::from_index("http://example.org/")
            .unwrap()
            .with_institution("gov")
            .with_category_marker("categorie")
            .with_pagination_selector("div#pager")
            .unwrap();
        assert_eq!(config.institution, "gov");
        assert_eq!(config.category_marker, "categorie");
    }

    #[test]
    fn test_bad_index_url() {
        assert!(matches!(
            CrawlConfig::from_index("not a url"),
            Err(ExtractError::InvalidUrl(_))
        ));
    }
}
