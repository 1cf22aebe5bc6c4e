// src/extractors/links.rs
use super::dom::PageDocument;
use once_cell::sync::Lazy;
use scraper::Selector;
use std::collections::BTreeSet;
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to compile ANCHOR_SELECTOR")
});

// Some index layouts list categories in a drop-down instead of anchors
static OPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("option[value]").expect("Failed to compile OPTION_SELECTOR")
});

/// Collects the distinct category page URLs linked from `page`.
///
/// A link qualifies when its raw target contains `marker` and it resolves
/// to the same host as `site`.
pub fn discover_category_links(page: &PageDocument, site: &Url, marker: &str) -> BTreeSet<Url> {
    let anchors = page
        .all_matching(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"));
    let options = page
        .all_matching(&OPTION_SELECTOR)
        .filter_map(|o| o.value().attr("value"));

    let mut links = BTreeSet::new();
    for target in anchors.chain(options) {
        if !target.contains(marker) {
            continue;
        }
        match page.resolve(target) {
            Some(mut url) if url.host_str() == site.host_str() => {
                url.set_fragment(None);
                links.insert(url);
            }
            Some(url) => tracing::debug!("Ignoring off-site category link: {}", url),
            None => tracing::debug!("Ignoring unresolvable category link: '{}'", target),
        }
    }

    tracing::debug!("Discovered {} category links on {}", links.len(), page.url());
    links
}
