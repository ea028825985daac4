use std::net::IpAddr;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use once_cell::sync::Lazy;
use regex::Regex;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client as ReqwestClient, Response};
use thiserror::Error;
use url::Url;

use crate::config::FetchSettings;

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid scheme regex"));

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Please enter a valid website address")]
    InvalidUrl,

    #[error("Only http/https URLs are supported")]
    UnsupportedScheme,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL resolves to a private or reserved address")]
    PrivateAddress,

    #[error("Could not resolve URL host")]
    Unresolvable,

    #[error("Timed out waiting for the page to respond")]
    Timeout,

    #[error("Failed to receive response from the server. Please check the URL and try again.")]
    Network(#[source] reqwest::Error),

    #[error("Failed to fetch URL ({status}): {reason}")]
    Status { status: u16, reason: String },

    #[error("Page is larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Failed to read the page body")]
    Body,

    #[error("Too many redirects")]
    TooManyRedirects,
}

// ── URL handling ───────────────────────────────────────────────────────────

/// Trim the input, prepend `https://` when no scheme is given, and require an
/// absolute http(s) URL with a host.
pub fn normalize_url(input: &str) -> Result<Url, FetchError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl);
    }

    let candidate = if SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|_| FetchError::InvalidUrl)?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(FetchError::UnsupportedScheme),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(FetchError::MissingHost);
    }
    Ok(parsed)
}

/// Returns `true` if `ip` is a private, loopback, or link-local address.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            matches!(
                o,
                [127, ..]
                    | [10, ..]
                    | [169, 254, ..]
                    | [192, 168, ..]
                    | [0, ..]
                    | [255, 255, 255, 255]
            ) || (o[0] == 172 && (16..=31).contains(&o[1]))
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00 == 0xfc00)
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(IpAddr::V4(v4)))
        }
    }
}

/// Resolve the target host and reject it if any address is private.
pub async fn ensure_public_host(url: &Url) -> Result<(), FetchError> {
    let host = url.host_str().ok_or(FetchError::MissingHost)?;
    let port = url.port_or_known_default().unwrap_or(80);
    // IPv6 literals arrive bracketed; lookup_host wants them bare
    let host = host.trim_start_matches('[').trim_end_matches(']');

    let addrs = tokio::net::lookup_host((host, port))
        .await
        .map_err(|_| FetchError::Unresolvable)?;

    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(FetchError::PrivateAddress);
        }
    }
    Ok(())
}

// ── Fetching ───────────────────────────────────────────────────────────────

/// Source of page HTML. The analyzer never fetches anything itself.
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<String, FetchError>>;
}

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Fetches pages over HTTP with a fixed timeout. One attempt, no retries.
///
/// Redirects are followed by hand so that every hop passes the same target
/// checks as the first request.
pub struct HttpFetcher {
    client: ReqwestClient,
    timeout: Duration,
    allow_private_targets: bool,
    max_html_bytes: usize,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(settings.user_agent.as_str())
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            timeout,
            allow_private_targets: settings.allow_private_targets,
            max_html_bytes: settings.max_html_bytes,
        })
    }

    /// Reject targets this fetcher may not contact.
    async fn admit(&self, url: &Url) -> Result<(), FetchError> {
        if self.allow_private_targets {
            return Ok(());
        }
        ensure_public_host(url).await
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, FetchError> {
        tokio::time::timeout(self.timeout, self.fetch_within_deadline(url))
            .await
            .map_err(|_| FetchError::Timeout)?
    }

    async fn fetch_within_deadline(&self, url: &Url) -> Result<String, FetchError> {
        let mut target = url.clone();
        let mut hops = 0;

        let response = loop {
            self.admit(&target).await?;

            let response = self
                .client
                .get(target.as_str())
                .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                .send()
                .await
                .map_err(map_send_error)?;

            if !response.status().is_redirection() {
                break response;
            }
            let Some(next) = redirect_target(&target, response.headers())? else {
                break response;
            };
            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(FetchError::TooManyRedirects);
            }
            tracing::debug!(from = %target, to = %next, "Following redirect");
            target = next;
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let limit = self.max_html_bytes;
        if response.content_length().is_some_and(|len| len as usize > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        let encoding = response_encoding(response.headers());
        let bytes = read_limited(response, limit).await?;
        let (text, _, _) = encoding.decode(&bytes);
        Ok(text.into_owned())
    }
}

/// Resolve the `Location` of a redirect against the current URL. A redirect
/// without a usable `Location` is treated as a final response.
fn redirect_target(current: &Url, headers: &HeaderMap) -> Result<Option<Url>, FetchError> {
    let Some(location) = headers.get(LOCATION) else {
        return Ok(None);
    };
    let location = location.to_str().map_err(|_| FetchError::InvalidUrl)?;
    let next = current.join(location).map_err(|_| FetchError::InvalidUrl)?;
    match next.scheme() {
        "http" | "https" => Ok(Some(next)),
        _ => Err(FetchError::UnsupportedScheme),
    }
}

/// Encoding named by the `Content-Type` charset, UTF-8 otherwise.
fn response_encoding(headers: &HeaderMap) -> &'static Encoding {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value.split(';').skip(1).find_map(|param| {
                let (key, charset) = param.split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("charset")
                    .then(|| charset.trim().trim_matches('"'))
            })
        })
        .and_then(|charset| Encoding::for_label(charset.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Read the body chunk by chunk, failing as soon as it passes `limit` bytes.
async fn read_limited(mut response: Response, limit: usize) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Body
        }
    })? {
        if body.len() + chunk.len() > limit {
            return Err(FetchError::TooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn map_send_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<String, FetchError>> {
        async move {
            let result = self.fetch_html(url).await;
            if let Err(ref e) = result {
                tracing::warn!(error = %e, url = %url, "Failed to fetch page");
            }
            result
        }
        .boxed()
    }
}
