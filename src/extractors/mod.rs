// src/extractors/mod.rs
pub mod dates;
pub mod documents;
pub mod dom;
pub mod identifier;
pub mod links;
pub mod pagination;
pub mod row;

// Re-export key extraction entry points for convenience
pub use dom::PageDocument;
pub use links::discover_category_links;
pub use pagination::next_page;
pub use row::extract_publications;
