// src/extractors/identifier.rs
use sha2::{Digest, Sha256};
use url::Url;

const SEPARATOR: &str = " : ";

/// Builds the upsert key of a publication.
///
/// Titles repeat across institutions and pages, so the source page URL is
/// part of the key. The title must already be whitespace-collapsed.
pub fn identify(institution: &str, title: &str, source_url: &Url) -> String {
    let digest = hex::encode(Sha256::digest(title.as_bytes()));
    [institution, source_url.as_str(), digest.as_str()].join(SEPARATOR)
}
