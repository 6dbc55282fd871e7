//! Link preview metadata extraction.
//!
//! Pages are fetched once, scanned for Open Graph `og:*` tags, and any field the
//! tags leave empty is filled from an ordered list of plain-HTML fallbacks.
//!
//! ```no_run
//! use og_preview::{Extractor, NetworkConfig};
//!
//! # async fn run() -> Result<(), og_preview::PreviewError> {
//! let extractor = Extractor::new(NetworkConfig::default())?;
//! let result = extractor
//!     .extract("https://www.rust-lang.org", "Mozilla/5.0 (compatible; og-preview)")
//!     .await?;
//! println!("{:?}", result.title);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod document;
mod error;
mod extractor;
mod fallback;
mod fetcher;
#[cfg(feature = "logging")]
mod logging;
mod og_scanner;
mod utils;

pub use document::Document;
pub use error::PreviewError;
pub use extractor::Extractor;
pub use fallback::{apply_fallbacks, FallbackRule, ValueSource};
pub use fetcher::{FetchedPage, Fetcher, NetworkConfig, ProxyConfig, DEFAULT_TIMEOUT_MS, REFERRER};
#[cfg(feature = "logging")]
pub use logging::{log_error_card, log_result_card, setup_logging, LogConfig, LogLevelGuard};
pub use og_scanner::scan_og;
pub use utils::base_url;

/// Preview metadata for one page. `None` and `Some("")` are distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub site_name: Option<String>,
    #[serde(rename = "type")]
    pub og_type: Option<String>,
}

impl ExtractionResult {
    /// True when no field holds a non-empty value.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| is_blank(self.get(*field)))
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Description => self.description.as_deref(),
            Field::Image => self.image.as_deref(),
            Field::Url => self.url.as_deref(),
            Field::SiteName => self.site_name.as_deref(),
            Field::Type => self.og_type.as_deref(),
        }
    }

    pub(crate) fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Image => &mut self.image,
            Field::Url => &mut self.url,
            Field::SiteName => &mut self.site_name,
            Field::Type => &mut self.og_type,
        }
    }
}

/// One field of [`ExtractionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Image,
    Url,
    SiteName,
    Type,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Description,
        Field::Image,
        Field::Url,
        Field::SiteName,
        Field::Type,
    ];
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

#[async_trait]
pub trait LinkPreviewer {
    async fn preview(&self, url: &str, user_agent: &str)
        -> Result<ExtractionResult, PreviewError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_counts_as_empty() {
        let mut result = ExtractionResult::default();
        assert!(result.is_empty());

        result.title = Some(String::new());
        assert!(result.is_empty());

        result.og_type = Some("article".into());
        assert!(!result.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_and_type_key() {
        let result = ExtractionResult {
            site_name: Some("Example".into()),
            og_type: Some("website".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["siteName"], "Example");
        assert_eq!(json["type"], "website");
        assert!(json["title"].is_null());
    }
}
