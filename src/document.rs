use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parsed HTML page together with the address relative references resolve against.
pub struct Document {
    html: Html,
    base_uri: Url,
}

impl Document {
    /// Parses `html` fetched from `page_url`. The first `<base href>` in the
    /// markup, if any, overrides `page_url` as the base URI.
    pub fn parse(html: &str, page_url: &Url) -> Self {
        let html = Html::parse_document(html);
        let base_uri = Selector::parse("base[href]")
            .ok()
            .and_then(|selector| {
                html.select(&selector)
                    .next()
                    .and_then(|el| el.value().attr("href"))
                    .and_then(|href| page_url.join(href.trim()).ok())
            })
            .unwrap_or_else(|| page_url.clone());

        Self { html, base_uri }
    }

    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Elements matching `selector` in document order. An unparsable selector matches nothing.
    pub fn select<'a>(&'a self, selector: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Text of the first `<title>`, whitespace-normalized; empty if there is none.
    pub fn title(&self) -> String {
        self.select("title")
            .first()
            .map(text_of)
            .unwrap_or_default()
    }

    /// Absolute form of `reference`, or `None` when it cannot be resolved.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        self.base_uri.join(reference.trim()).ok().map(String::from)
    }
}

/// Attribute value, empty when the attribute is missing.
pub fn attr(element: &ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

pub fn text_of(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
