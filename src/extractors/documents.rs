// src/extractors/documents.rs
use super::dom::collapsed_text;
use scraper::ElementRef;

/// File extensions recognized as attached documents. Matching is literal,
/// so `.PDF` is not a document.
pub const DOC_EXTENSIONS: &[&str] = &[
    ".docs", ".doc", ".txt", ".crt", ".xls", ".xml", ".pdf", ".docx", ".xlsx",
];

/// An anchor that points at a whitelisted document. `href` is exactly as
/// written in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink<'a> {
    pub label: String,
    pub href: &'a str,
}

/// Lazily filters anchors down to document links, keeping page order.
#[derive(Clone)]
pub struct DocumentLinks<'a, 'w, I> {
    anchors: I,
    extensions: &'w [String],
    _page: std::marker::PhantomData<ElementRef<'a>>,
}

impl<'a, 'w, I> Iterator for DocumentLinks<'a, 'w, I>
where
    I: Iterator<Item = ElementRef<'a>>,
{
    type Item = DocumentLink<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for anchor in self.anchors.by_ref() {
            // Anchors without a target are just skipped
            let Some(href) = anchor.value().attr("href") else {
                tracing::trace!("Skipping anchor without href: '{}'", collapsed_text(anchor));
                continue;
            };

            if is_document(href, self.extensions) {
                return Some(DocumentLink {
                    label: collapsed_text(anchor),
                    href,
                });
            }
        }
        None
    }
}

pub fn document_links<'a, 'w, I>(anchors: I, extensions: &'w [String]) -> DocumentLinks<'a, 'w, I::IntoIter>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    DocumentLinks {
        anchors: anchors.into_iter(),
        extensions,
        _page: std::marker::PhantomData,
    }
}

pub fn is_document(href: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| href.ends_with(ext.as_str()))
}

pub fn default_extensions() -> Vec<String> {
    DOC_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn anchors_of(html: &Html) -> Vec<ElementRef<'_>> {
        let a = Selector::parse("a").unwrap();
        html.select(&a).collect()
    }

    #[test]
    fn test_whitelist_is_case_sensitive() {
        let html = Html::parse_fragment(
            r#"<a href="a.pdf">A</a><a href="b.exe">B</a><a href="c.DOCX">C</a><a href="d">D</a>"#,
        );
        let extensions = default_extensions();
        let links: Vec<_> = document_links(anchors_of(&html), &extensions).collect();

        assert_eq!(
            links,
            vec![DocumentLink { label: "A".to_string(), href: "a.pdf" }]
        );
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = Html::parse_fragment(
            r#"<a name="sus">Sus</a><a href="/docs/nota.doc">Nota
                 de fundamentare</a><a>gol</a><a href="anexa.xlsx">Anexa</a>"#,
        );
        let extensions = default_extensions();
        let links: Vec<_> = document_links(anchors_of(&html), &extensions).collect();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "Nota de fundamentare");
        assert_eq!(links[0].href, "/docs/nota.doc");
        assert_eq!(links[1].href, "anexa.xlsx");
    }

    #[test]
    fn test_iteration_can_be_restarted() {
        let html = Html::parse_fragment(r#"<a href="x.txt">x</a><a href="y.xml">y</a>"#);
        let extensions = default_extensions();
        let anchors = anchors_of(&html);
        let links = document_links(anchors.iter().copied(), &extensions);

        let first: Vec<_> = links.clone().map(|l| l.href).collect();
        let second: Vec<_> = links.map(|l| l.href).collect();
        assert_eq!(first, vec!["x.txt", "y.xml"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_query_string_hides_extension() {
        let extensions = default_extensions();
        assert!(!is_document("download.php?file=a.pdf&v=2", &extensions));
        assert!(is_document("download.php?file=a.pdf", &extensions));
    }
}
