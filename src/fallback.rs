use crate::document::{attr, text_of, Document};
use crate::utils::base_url;
use crate::{is_blank, ExtractionResult, Field};
use tracing::debug;

/// Where a matched element's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Attr(&'static str),
    Text,
}

/// One alternative source for a field: the first element matching `selector`
/// supplies the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackRule {
    pub selector: &'static str,
    pub source: ValueSource,
    /// Resolve the value against the document base URI.
    pub resolve: bool,
}

impl FallbackRule {
    const fn attr(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            source: ValueSource::Attr(name),
            resolve: false,
        }
    }

    const fn resolved(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            source: ValueSource::Attr(name),
            resolve: true,
        }
    }

    /// Value produced by this rule, or `None` when it yields nothing usable.
    pub fn evaluate(&self, document: &Document) -> Option<String> {
        let elements = document.select(self.selector);
        let element = elements.first()?;
        let value = match self.source {
            ValueSource::Attr(name) => attr(element, name),
            ValueSource::Text => text_of(element),
        };
        if value.is_empty() {
            return None;
        }
        if self.resolve {
            document.resolve(&value)
        } else {
            Some(value)
        }
    }
}

pub const TITLE_RULES: &[FallbackRule] = &[FallbackRule {
    selector: "title",
    source: ValueSource::Text,
    resolve: false,
}];

pub const DESCRIPTION_RULES: &[FallbackRule] = &[
    FallbackRule::attr("meta[name=description]", "content"),
    FallbackRule::attr("meta[name=Description]", "content"),
];

pub const IMAGE_RULES: &[FallbackRule] = &[
    FallbackRule::resolved(r#"meta[name="og:image"]"#, "content"),
    FallbackRule::resolved("link[rel=image_src]", "href"),
    FallbackRule::resolved("link[rel=apple-touch-icon]", "href"),
    FallbackRule::resolved("link[rel=icon]", "href"),
];

/// What a field becomes when none of its rules match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnMiss {
    Absent,
    Empty,
}

struct FieldFallback {
    field: Field,
    rules: &'static [FallbackRule],
    on_miss: OnMiss,
}

const FIELD_FALLBACKS: &[FieldFallback] = &[
    FieldFallback {
        field: Field::Title,
        rules: TITLE_RULES,
        on_miss: OnMiss::Empty,
    },
    FieldFallback {
        field: Field::Description,
        rules: DESCRIPTION_RULES,
        on_miss: OnMiss::Empty,
    },
    FieldFallback {
        field: Field::Image,
        rules: IMAGE_RULES,
        on_miss: OnMiss::Absent,
    },
];

/// First non-empty value from `rules`, in order.
pub fn first_match(document: &Document, rules: &[FallbackRule]) -> Option<String> {
    rules.iter().find_map(|rule| rule.evaluate(document))
}

/// Fills fields the Open Graph scan left empty.
///
/// Title, description and image follow their rule lists; on a miss title and
/// description become empty strings while image stays absent. `url` falls back to
/// the scheme and host of `request_url`, ignoring any redirect the fetch
/// followed. `site_name` and `og_type` have no fallback.
pub fn apply_fallbacks(
    document: &Document,
    mut result: ExtractionResult,
    request_url: &str,
) -> ExtractionResult {
    for fallback in FIELD_FALLBACKS {
        let slot = result.slot(fallback.field);
        if !is_blank(slot.as_deref()) {
            continue;
        }
        match first_match(document, fallback.rules) {
            Some(value) => {
                debug!(field = ?fallback.field, value = %value, "Filled from fallback");
                *slot = Some(value);
            }
            None => {
                *slot = match fallback.on_miss {
                    OnMiss::Absent => None,
                    OnMiss::Empty => Some(String::new()),
                };
            }
        }
    }

    if is_blank(result.url.as_deref()) {
        if let Ok(base) = base_url(request_url) {
            result.url = Some(base);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn doc(html: &str) -> Document {
        Document::parse(html, &Url::parse("http://example.com/blog/post").unwrap())
    }

    fn fill(html: &str, scanned: ExtractionResult) -> ExtractionResult {
        apply_fallbacks(&doc(html), scanned, "http://example.com/blog/post")
    }

    #[test]
    fn title_falls_back_to_title_element() {
        let result = fill(
            "<html><head><title>Page Title</title></head></html>",
            ExtractionResult::default(),
        );
        assert_eq!(result.title.as_deref(), Some("Page Title"));
    }

    #[test]
    fn description_prefers_lowercase_name() {
        let html = r#"<html><head>
            <meta name="Description" content="upper">
            <meta name="description" content="lower">
        </head></html>"#;
        let result = fill(html, ExtractionResult::default());
        assert_eq!(result.description.as_deref(), Some("lower"));
    }

    #[test]
    fn description_uses_capitalized_name_when_only_option() {
        let html = r#"<html><head><meta name="Description" content="upper"></head></html>"#;
        let result = fill(html, ExtractionResult::default());
        assert_eq!(result.description.as_deref(), Some("upper"));
    }

    #[test]
    fn image_rules_are_evaluated_in_order() {
        let html = r#"<html><head>
            <link rel="icon" href="/favicon.png">
            <link rel="apple-touch-icon" href="/touch.png">
            <link rel="image_src" href="/share.png">
        </head></html>"#;
        let result = fill(html, ExtractionResult::default());
        assert_eq!(result.image.as_deref(), Some("http://example.com/share.png"));
    }

    #[test]
    fn meta_name_og_image_is_resolved() {
        let html = r#"<html><head>
            <meta name="og:image" content="cover.jpg">
            <link rel="icon" href="/favicon.png">
        </head></html>"#;
        let result = fill(html, ExtractionResult::default());
        assert_eq!(
            result.image.as_deref(),
            Some("http://example.com/blog/cover.jpg")
        );
    }

    #[test]
    fn empty_candidate_moves_to_next_rule() {
        let html = r#"<html><head>
            <link rel="image_src" href="">
            <link rel="icon" href="/favicon.png">
        </head></html>"#;
        let result = fill(html, ExtractionResult::default());
        assert_eq!(result.image.as_deref(), Some("http://example.com/favicon.png"));
    }

    #[test]
    fn image_is_absent_when_nothing_matches() {
        let scanned = ExtractionResult {
            image: Some(String::new()),
            ..Default::default()
        };
        let result = fill("<html><head></head></html>", scanned);
        assert_eq!(result.image, None);
    }

    #[test]
    fn scanned_values_are_never_overwritten() {
        let html = r#"<html><head>
            <title>Fallback</title>
            <meta name="description" content="fallback desc">
            <link rel="icon" href="/favicon.png">
        </head></html>"#;
        let scanned = ExtractionResult {
            title: Some("OG".into()),
            description: Some("OG desc".into()),
            image: Some("https://cdn.example.com/og.png".into()),
            url: Some("https://example.com/canonical".into()),
            ..Default::default()
        };
        let result = fill(html, scanned.clone());
        assert_eq!(result, scanned);
    }

    #[test]
    fn url_falls_back_to_request_origin() {
        let result = apply_fallbacks(
            &doc("<html></html>"),
            ExtractionResult::default(),
            "https://example.com:8443/a/b?c=d",
        );
        assert_eq!(result.url.as_deref(), Some("https://example.com:8443"));
    }

    #[test]
    fn fields_without_rules_stay_empty() {
        let result = fill(
            "<html><head><title>t</title></head></html>",
            ExtractionResult::default(),
        );
        assert!(result.site_name.is_none());
        assert!(result.og_type.is_none());
    }

    #[test]
    fn unmatched_title_and_description_become_empty() {
        let result = fill("<html><head></head></html>", ExtractionResult::default());
        assert_eq!(result.title.as_deref(), Some(""));
        assert_eq!(result.description.as_deref(), Some(""));
        assert_eq!(result.image, None);
    }

    #[test]
    fn empty_title_element_counts_as_miss() {
        let html = r#"<html><head><title>   </title><meta name="description" content=""></head></html>"#;
        let scanned = ExtractionResult {
            description: Some(String::new()),
            ..Default::default()
        };
        let result = fill(html, scanned);
        assert_eq!(result.title.as_deref(), Some(""));
        assert_eq!(result.description.as_deref(), Some(""));
    }
}
