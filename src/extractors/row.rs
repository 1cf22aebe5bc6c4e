// src/extractors/row.rs

// --- Imports ---
use super::dates::normalize_date;
use super::documents::document_links;
use super::dom::{collapsed_text, text_within, PageDocument};
use super::identifier::identify;
use crate::crawler::config::CrawlConfig;
use crate::models::{Document, Publication};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

// --- CSS Selectors (Lazy Static) ---
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2").expect("Failed to compile HEADING_SELECTOR")
});

// Most cells wrap their value in a div
static CELL_VALUE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div").expect("Failed to compile CELL_VALUE_SELECTOR")
});

// The type column highlights the label
static TYPE_VALUE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div strong").expect("Failed to compile TYPE_VALUE_SELECTOR")
});

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile ANCHOR_SELECTOR")
});

/// Name of the institution a category page belongs to, from its `h2`.
pub fn institution_heading(page: &PageDocument) -> Result<String, ExtractError> {
    page.text_of(&HEADING_SELECTOR)
        .filter(|heading| !heading.is_empty())
        .ok_or_else(|| ExtractError::MalformedPage(format!("no institution heading on {}", page.url())))
}

/// Extracts every publication listed on a category page, in table order.
pub fn extract_publications(page: &PageDocument, config: &CrawlConfig) -> Result<Vec<Publication>, ExtractError> {
    let initiator = institution_heading(page)?;
    tracing::info!("scraping: {} - {}", page.url(), initiator);

    let publications = page
        .all_matching(&config.row_selector)
        .filter_map(|row| extract_row(row, page, &initiator, config))
        .collect::<Vec<_>>();

    tracing::debug!("Extracted {} publications from {}", publications.len(), page.url());
    Ok(publications)
}

/// Turns one table row into a publication.
///
/// Rows without a first cell, or with an empty title, are header or
/// separator rows and produce nothing.
pub fn extract_row(
    row: ElementRef,
    page: &PageDocument,
    initiator: &str,
    config: &CrawlConfig,
) -> Option<Publication> {
    let cells: Vec<ElementRef> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .collect();

    let columns = &config.columns;
    let text = |column: usize| cell_text(&cells, column, &CELL_VALUE_SELECTOR);

    let title = text(columns.title);
    if title.is_empty() {
        tracing::trace!("Skipping row without title on {}", page.url());
        return None;
    }

    let documents = document_links(row.select(&ANCHOR_SELECTOR), &config.document_extensions)
        .filter_map(|link| {
            let url = page.resolve(link.href)?;
            Some(Document {
                kind: link.label,
                url: url.to_string(),
            })
        })
        .collect();

    let date_consultare = text(columns.consultation);

    Some(Publication {
        institution: config.institution.clone(),
        identifier: identify(initiator, &title, page.url()),
        kind: cell_text(&cells, columns.kind, &TYPE_VALUE_SELECTOR),
        date: normalize_date(&date_consultare),
        title,
        description: String::new(),
        documents,
        contact: None,
        feedback_days: None,
        max_feedback_date: None,
        date_consultare,
        date_procedura_avizare: text(columns.review_procedure),
        avizatori: text(columns.reviewers),
        date_termen_avize: text(columns.review_deadline),
        mfpmjmfe: text(columns.ministry_review),
        date_termen_reavizare: text(columns.re_review_deadline),
        initiator: initiator.to_string(),
    })
}

/// Collapsed value of a 1-based column; missing cells read as "".
fn cell_text(cells: &[ElementRef], column: usize, value: &Selector) -> String {
    column
        .checked_sub(1)
        .and_then(|index| cells.get(index))
        .map(|cell| text_within(*cell, value).unwrap_or_else(|| collapsed_text(*cell)))
        .unwrap_or_default()
}
