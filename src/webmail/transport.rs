use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use url::form_urlencoded;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT_VALUE: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:147.0) Gecko/20100101 Firefox/147.0";
const ACCEPT_VALUE: &str = "application/json, text/javascript, */*; q=0.01";
const CONTENT_TYPE_VALUE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
const ORIGIN_VALUE: &str = "https://steamwebmail.com";
const REFERER_VALUE: &str = "https://steamwebmail.com/";

/// Blocking HTTP collaborator used by [`WebMail`](super::WebMail).
pub trait Transport {
    /// GET `url` and return the body text.
    fn get(&self, url: &str) -> Result<String>;

    /// POST `form` url-encoded to `url` and return the body text.
    fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// `scheme://[user:pass@]host:port`, used for both http and https.
    pub proxy: Option<String>,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The header set the provider's frontend sends.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_VALUE));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(ORIGIN, HeaderValue::from_static(ORIGIN_VALUE));
    headers.insert(REFERER, HeaderValue::from_static(REFERER_VALUE));
    headers
}

/// `application/x-www-form-urlencoded` body, in field order.
///
/// Sent via `body` so the default Content-Type (with its charset) stays
/// the only one on the request.
pub fn encode_form(form: &[(&str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(cfg: &TransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .default_headers(default_headers())
            .cookie_store(true)
            .timeout(cfg.timeout);

        // Routing is explicit: no proxy configured means a direct connection,
        // whatever HTTP(S)_PROXY says.
        builder = match &cfg.proxy {
            Some(proxy) => builder.proxy(
                reqwest::Proxy::all(proxy.as_str())
                    .with_context(|| format!("invalid proxy URL '{proxy}'"))?,
            ),
            None => builder.no_proxy(),
        };

        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let body = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?
            .text()?;
        Ok(body)
    }

    fn post_form(&self, url: &str, form: &[(&str, String)]) -> Result<String> {
        let body = self
            .http
            .post(url)
            .body(encode_form(form))
            .send()
            .with_context(|| format!("POST {url}"))?
            .error_for_status()?
            .text()?;
        Ok(body)
    }
}
