use crate::PreviewError;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const REFERRER: &str = "http://www.google.com";
const MAX_REDIRECTS: usize = 10;

/// HTTP proxy endpoint used for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn to_proxy_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Network settings applied to every fetch.
///
/// # Examples
/// ```
/// use og_preview::{NetworkConfig, ProxyConfig};
/// use std::time::Duration;
///
/// let config = NetworkConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_proxy(ProxyConfig::new("10.0.0.1", 3128))
///     .with_max_body_size(512 * 1024);
/// assert_eq!(config.max_body_size, Some(512 * 1024));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub timeout: Duration,
    pub proxy: Option<ProxyConfig>,
    /// Unbounded when `None`.
    pub max_body_size: Option<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            proxy: None,
            max_body_size: None,
        }
    }
}

impl NetworkConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = Some(bytes);
        self
    }
}

/// Raw page as returned by the server after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: Url,
    pub html: String,
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: NetworkConfig,
}

impl Fetcher {
    pub fn new(config: NetworkConfig) -> Result<Self, PreviewError> {
        let mut client_builder = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

        client_builder = match &config.proxy {
            Some(proxy) => {
                let proxy = Proxy::all(proxy.to_proxy_url()).map_err(|e| {
                    error!(error = %e, "Invalid proxy configuration");
                    PreviewError::ClientBuild(e.to_string())
                })?;
                client_builder.proxy(proxy)
            }
            None => client_builder.no_proxy(),
        };

        let client = client_builder.build().map_err(|e| {
            error!(error = %e, "Failed to create HTTP client");
            PreviewError::ClientBuild(e.to_string())
        })?;

        debug!(config = ?config, "Fetcher initialized");
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// GETs `url` and returns its body regardless of the declared content type.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch(&self, url: &str, user_agent: &str) -> Result<FetchedPage, PreviewError> {
        let url = Url::parse(url)?;
        debug!(url = %url, "Starting fetch request");

        let mut response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, user_agent)
            .header(REFERER, REFERRER)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "Failed to send request");
                PreviewError::from(e)
            })?
            .error_for_status()?;

        let final_url = response.url().clone();
        if final_url != url {
            debug!(from = %url, to = %final_url, "Followed redirect");
        }

        if let (Some(limit), Some(declared)) = (self.config.max_body_size, response.content_length())
        {
            if declared > limit as u64 {
                return Err(PreviewError::BodyTooLarge { limit });
            }
        }

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_param)
            .map(str::to_owned);

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            error!(error = %e, url = %final_url, "Failed to read response body");
            PreviewError::from(e)
        })? {
            body.extend_from_slice(&chunk);
            if let Some(limit) = self.config.max_body_size {
                if body.len() > limit {
                    return Err(PreviewError::BodyTooLarge { limit });
                }
            }
        }

        debug!(url = %final_url, content_length = body.len(), "Successfully fetched webpage");
        Ok(FetchedPage {
            final_url,
            html: decode_body(&body, charset.as_deref()),
        })
    }
}

/// `charset` parameter of a `Content-Type` value, if present.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Decodes with the declared charset, falling back to UTF-8 for missing or
/// unknown labels. A byte order mark takes precedence over either.
fn decode_body(body: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, actual, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = actual.name(), "Body contained invalid sequences");
    }
    text.into_owned()
}
