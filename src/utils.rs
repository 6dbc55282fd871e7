use unicode_width::UnicodeWidthChar;

use url::{ParseError, Url};

/// Safely truncate a string, ensuring it is not truncated in the middle of multi-byte characters
///
/// The display width of the output, ellipsis included, never exceeds `max_width`.
#[cfg_attr(not(feature = "logging"), allow(dead_code))]
pub fn truncate_str(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);

        if current_width + char_width + 3 > max_width {
            break;
        }

        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// Scheme, host and non-default port of `url`, e.g. `https://example.com:8443`.
pub fn base_url(url: &str) -> Result<String, ParseError> {
    let parsed_url = Url::parse(url)?;
    let host = parsed_url.host_str().ok_or(ParseError::EmptyHost)?;

    let port = parsed_url
        .port()
        .map(|x| format!(":{x}"))
        .unwrap_or_default();

    Ok(format!("{}://{host}{port}", parsed_url.scheme()))
}
