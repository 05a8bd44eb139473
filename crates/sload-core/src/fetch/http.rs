//! Curl-backed fetch.
//!
//! Performs a blocking transfer on the calling thread and buffers the whole
//! body in memory; resources handled by the loader are scripts, stylesheets
//! and small data files, not bulk downloads.

use std::str;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::env::Fetch;
use crate::error::TransportError;

use super::parse::parse_headers;
use super::{FetchInit, Response};

/// [`Fetch`] implementation using libcurl.
#[derive(Debug, Clone, Default)]
pub struct CurlFetch {
    config: FetchConfig,
}

impl CurlFetch {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Resolve `url` against the configured base URL, if any.
    pub fn resolve(&self, url: &str) -> Result<String, TransportError> {
        let Some(base) = self.config.base_url.as_deref() else {
            return Ok(url.to_string());
        };
        let base = url::Url::parse(base).map_err(|source| TransportError::InvalidUrl {
            url: base.to_string(),
            source,
        })?;
        let joined = base.join(url).map_err(|source| TransportError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(joined.into())
    }
}

impl Fetch for CurlFetch {
    fn fetch(&self, url: &str, init: &FetchInit) -> Result<Response, TransportError> {
        let target = self.resolve(url)?;
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&target)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.config.max_redirections)?;
        easy.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.config.timeout_secs))?;
        if let Some(agent) = self.config.user_agent.as_deref() {
            easy.useragent(agent)?;
        }

        match init.method() {
            "GET" => {}
            "HEAD" => easy.nobody(true)?,
            other => easy.custom_request(other)?,
        }
        if let Some(payload) = init.body.as_deref() {
            easy.post_fields_copy(payload.as_bytes())?;
        }

        // Build curl list for custom headers (e.g. "Name: value").
        let mut list = curl::easy::List::new();
        for (k, v) in &init.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !init.headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        let effective = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| target.clone());
        tracing::debug!(url = %effective, status, bytes = body.len(), "fetch complete");

        if !(200..300).contains(&status) {
            return Err(TransportError::Http(status));
        }

        Ok(Response {
            url: effective,
            status,
            headers: parse_headers(&header_lines),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_base_is_identity() {
        let f = CurlFetch::default();
        assert_eq!(f.resolve("data/a.json").unwrap(), "data/a.json");
    }

    #[test]
    fn resolve_joins_relative_urls() {
        let f = CurlFetch::new(FetchConfig {
            base_url: Some("https://cdn.example.com/assets/".to_string()),
            ..FetchConfig::default()
        });
        assert_eq!(
            f.resolve("app.css").unwrap(),
            "https://cdn.example.com/assets/app.css"
        );
        assert_eq!(
            f.resolve("/root.js").unwrap(),
            "https://cdn.example.com/root.js"
        );
        assert_eq!(
            f.resolve("https://other.example.com/x.html").unwrap(),
            "https://other.example.com/x.html"
        );
    }

    #[test]
    fn resolve_rejects_bad_base() {
        let f = CurlFetch::new(FetchConfig {
            base_url: Some("not a url".to_string()),
            ..FetchConfig::default()
        });
        assert!(matches!(
            f.resolve("x.js"),
            Err(TransportError::InvalidUrl { .. })
        ));
    }
}
