// src/extractors/pagination.rs
use super::dom::{same_resource, PageDocument};
use once_cell::sync::Lazy;
use scraper::Selector;
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile ANCHOR_SELECTOR")
});

/// Finds the page that follows `page`, if any.
///
/// The last anchor of the navigation block is taken as "next". A link back
/// to the current page ends the chain. The returned URL carries no fragment.
pub fn next_page(page: &PageDocument, navigation: &Selector) -> Option<Url> {
    let container = page.all_matching(navigation).next()?;
    let last = container.select(&ANCHOR_SELECTOR).last()?;
    let href = last.value().attr("href")?;
    let mut next = page.resolve(href)?;
    next.set_fragment(None);

    if same_resource(&next, page.url()) {
        tracing::debug!("Pagination ends at {}", page.url());
        return None;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav() -> Selector {
        Selector::parse(".pagination").unwrap()
    }

    fn page(url: &str, body: &str) -> PageDocument {
        PageDocument::parse(body, Url::parse(url).unwrap())
    }

    #[test]
    fn test_last_anchor_is_next() {
        let doc = page(
            "http://www.sgg.ro/legislativ/domeniu.php?id=3",
            r#"<div class="pagination">
                <a href="domeniu.php?id=3&pag=1">1</a>
                <a href="domeniu.php?id=3&pag=2">2</a>
                <a href="domeniu.php?id=3&pag=2">&raquo;</a>
            </div>"#,
        );
        assert_eq!(
            next_page(&doc, &nav()).unwrap().as_str(),
            "http://www.sgg.ro/legislativ/domeniu.php?id=3&pag=2"
        );
    }

    #[test]
    fn test_self_link_terminates() {
        let doc = page(
            "http://www.sgg.ro/legislativ/domeniu.php?id=3&pag=4",
            r#"<div class="pagination"><a href="domeniu.php?id=3&pag=3">&laquo;</a><a href="domeniu.php?id=3&pag=4#top">4</a></div>"#,
        );
        assert_eq!(next_page(&doc, &nav()), None);
    }

    #[test]
    fn test_next_drops_fragment() {
        let doc = page(
            "http://www.sgg.ro/legislativ/domeniu.php?id=3&pag=2",
            r#"<div class="pagination"><a href="domeniu.php?id=3#top">&raquo;</a></div>"#,
        );
        assert_eq!(
            next_page(&doc, &nav()).unwrap().as_str(),
            "http://www.sgg.ro/legislativ/domeniu.php?id=3"
        );
    }

    #[test]
    fn test_missing_container_or_href() {
        let doc = page("http://www.sgg.ro/a.php", r#"<a href="b.php">b</a>"#);
        assert_eq!(next_page(&doc, &nav()), None);

        let doc = page("http://www.sgg.ro/a.php", r#"<div class="pagination"><a href="b.php">b</a><a>...</a></div>"#);
        assert_eq!(next_page(&doc, &nav()), None);

        let doc = page("http://www.sgg.ro/a.php", r#"<div class="pagination"></div>"#);
        assert_eq!(next_page(&doc, &nav()), None);
    }
}
