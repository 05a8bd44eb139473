//! Fetch request/response types and the curl-backed network primitive.
//!
//! `FetchInit` mirrors the subset of fetch init options the loader forwards
//! (`method`, `headers`, `body`); it is built from the loosely-typed `fetch`
//! option. `CurlFetch` is the one concrete [`Fetch`](crate::env::Fetch)
//! implementation shipped with the crate.

mod http;
mod parse;

use std::collections::BTreeMap;

use crate::value::Value;

pub use http::CurlFetch;

/// Request options forwarded to the network call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchInit {
    /// Only GET and HEAD are meaningful for resource loading; anything else is sent as a custom request.
    pub method: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl FetchInit {
    /// Read init options from a `fetch` option value. Unrecognized keys and
    /// non-string header values are ignored; `null` yields the defaults.
    pub fn from_value(value: &Value) -> Self {
        let mut init = FetchInit::default();
        let Some(map) = value.as_map() else {
            return init;
        };
        init.method = map.get("method").and_then(Value::as_str).map(str::to_string);
        init.body = map.get("body").and_then(Value::as_str).map(str::to_string);
        if let Some(headers) = map.get("headers").and_then(Value::as_map) {
            for (k, v) in headers {
                if let Some(s) = v.as_str() {
                    init.headers.insert(k.clone(), s.to_string());
                }
            }
        }
        init
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }
}

/// A completed HTTP response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// Effective URL after redirects.
    pub url: String,
    pub status: u32,
    /// Header names lower-cased; later duplicates win.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Body as text; invalid UTF-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
