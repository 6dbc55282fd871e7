use crate::document::{attr, Document};
use crate::{ExtractionResult, Field};
use tracing::debug;

const OG_TAGS: &str = r#"meta[property^="og:"]"#;

/// Open Graph properties this crate understands. Anything else under `og:` is skipped.
const OG_PROPERTIES: &[(&str, Field)] = &[
    ("og:image", Field::Image),
    ("og:description", Field::Description),
    ("og:url", Field::Url),
    ("og:title", Field::Title),
    ("og:site_name", Field::SiteName),
    ("og:type", Field::Type),
];

/// Collects `og:*` meta tags into a partial result.
///
/// Tags are visited in document order, so when a property repeats the last
/// occurrence is the one kept.
pub fn scan_og(document: &Document) -> ExtractionResult {
    let mut result = ExtractionResult::default();

    for tag in document.select(OG_TAGS) {
        let property = attr(&tag, "property");
        let Some((_, field)) = OG_PROPERTIES.iter().find(|(name, _)| *name == property) else {
            debug!(property = %property, "Ignoring unknown Open Graph property");
            continue;
        };
        *result.slot(*field) = Some(attr(&tag, "content"));
    }

    result
}
