//! Error types for registration, configuration and transport failures.
//!
//! `LoaderError` covers programmer errors that halt immediately (bad mode
//! shape, malformed `set`/`extract` calls, duplicate presets). Anything found
//! while working through a batch of load arguments is logged and skipped
//! instead; only transport failures travel further, to completion callbacks
//! and `LoadOutcome::Rejected`.

use thiserror::Error;

/// Structural or configuration error raised by the registry or a settings document.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A mode failed its structural contract at registration.
    #[error("mode.{field} {reason}")]
    Shape { field: &'static str, reason: String },
    /// `set()` given a non-map, `extract()` given a non-string name, and similar misuse.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A preset with this name is already registered.
    #[error("setting {0} already exists")]
    DuplicateName(String),
    /// The value handed over is not a settings document of this registry.
    #[error("setting for {0} was not a valid settings document")]
    TypeMismatch(String),
    /// A mode was invoked without any usable `url`.
    #[error("could not find a valid 'url' parameter")]
    MissingUrl,
    /// A mode name that is not registered.
    #[error("unknown mode: {0}")]
    UnknownMode(String),
}

/// Failure of the underlying fetch, module or script primitive.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The URL could not be resolved against the configured base.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Reported by a capability implementation (module resolver, script importer, ...).
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u32> {
        match self {
            TransportError::Http(code) => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_error_names_field() {
        let e = LoaderError::Shape {
            field: "name",
            reason: "must be a non-empty string".to_string(),
        };
        assert_eq!(e.to_string(), "mode.name must be a non-empty string");
    }

    #[test]
    fn transport_status_only_for_http() {
        assert_eq!(TransportError::Http(404).status(), Some(404));
        assert_eq!(TransportError::Other("boom".into()).status(), None);
        assert_eq!(TransportError::Http(503).to_string(), "HTTP 503");
    }
}
