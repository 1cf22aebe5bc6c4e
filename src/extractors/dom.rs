// src/extractors/dom.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use scraper::{html::Select, ElementRef, Html, Selector};
use url::Url;

/// A fetched HTML page together with the URL it was served from.
///
/// Extraction code only talks to pages through these accessors, so the
/// rest of the crate never depends on how the document was parsed.
pub struct PageDocument {
    html: Html,
    url: Url,
}

impl PageDocument {
    pub fn parse(body: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(body),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Every element matching `selector`, in document order.
    pub fn all_matching<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.select(selector)
    }

    /// Collapsed text of the first element matching `selector`.
    pub fn text_of(&self, selector: &Selector) -> Option<String> {
        self.all_matching(selector).next().map(collapsed_text)
    }

    /// Attribute `name` of the first matching element that carries it.
    pub fn attr_of(&self, selector: &Selector, name: &str) -> Option<&str> {
        self.all_matching(selector)
            .find_map(|element| element.value().attr(name))
    }

    /// Resolves a possibly relative link against this page's URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        match self.url.join(href) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::trace!("Could not resolve '{}' against {}: {}", href, self.url, e);
                None
            }
        }
    }
}

/// Compiles a CSS selector coming from configuration.
pub fn parse_selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector(format!("'{}': {:?}", css, e)))
}

/// Whole text content of `element` with every line trimmed and the lines
/// joined by single spaces. Inline markup adds no spaces of its own.
pub fn collapsed_text(element: ElementRef) -> String {
    collapse_lines(&element.text().collect::<String>())
}

/// Collapsed text of the first descendant of `element` matching `selector`.
pub fn text_within(element: ElementRef, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(collapsed_text)
}

pub fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when both URLs address the same resource, ignoring any fragment.
pub fn same_resource(a: &Url, b: &Url) -> bool {
    a[..url::Position::AfterQuery] == b[..url::Position::AfterQuery]
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> PageDocument {
        PageDocument::parse(body, Url::parse("http://www.sgg.ro/legislativ/domeniu.php?id=3").unwrap())
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_lines("  Foo\n  Bar  "), "Foo Bar");
        assert_eq!(collapse_lines("\n\n  "), "");
        assert_eq!(collapse_lines("Hotarare \nprivind\n  bugetul"), "Hotarare privind bugetul");
    }

    #[test]
    fn test_inline_markup_adds_no_spaces() {
        let doc = page(r#"<div>Proiect de <b>lege</b>, privind <i>H</i>G
                 pentru   anul <span>2021</span></div>"#);
        let div = parse_selector("div").unwrap();
        assert_eq!(
            doc.text_of(&div).as_deref(),
            Some("Proiect de lege, privind HG pentru   anul 2021")
        );
    }

    #[test]
    fn test_text_and_attr_accessors() {
        let doc = page(r#"<html><body><h2>
              Ministerul Sanatatii
            </h2><a name="top">x</a><a href="a.pdf">y</a></body></html>"#);
        let h2 = parse_selector("h2").unwrap();
        let a = parse_selector("a").unwrap();
        let table = parse_selector("table").unwrap();

        assert_eq!(doc.text_of(&h2).as_deref(), Some("Ministerul Sanatatii"));
        assert_eq!(doc.text_of(&table), None);
        assert_eq!(doc.attr_of(&a, "href"), Some("a.pdf"));
        assert_eq!(doc.all_matching(&a).count(), 2);
    }

    #[test]
    fn test_resolve_relative_and_empty() {
        let doc = page("<html></html>");
        assert_eq!(
            doc.resolve("docs/nota.pdf").unwrap().as_str(),
            "http://www.sgg.ro/legislativ/docs/nota.pdf"
        );
        assert_eq!(
            doc.resolve("?id=3&pag=2").unwrap().as_str(),
            "http://www.sgg.ro/legislativ/domeniu.php?id=3&pag=2"
        );
        assert!(doc.resolve("   ").is_none());
        assert!(doc.resolve("http://[::1").is_none());
    }

    #[test]
    fn test_same_resource_ignores_fragment() {
        let a = Url::parse("http://www.sgg.ro/x.php?id=1#top").unwrap();
        let b = Url::parse("http://www.sgg.ro/x.php?id=1").unwrap();
        let c = Url::parse("http://www.sgg.ro/x.php?id=2").unwrap();
        assert!(same_resource(&a, &b));
        assert!(!same_resource(&b, &c));
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        assert!(matches!(parse_selector("table[["), Err(ExtractError::InvalidSelector(_))));
    }
}
