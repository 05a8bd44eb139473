//! What a load produces, and the record handed to completion callbacks.

use crate::env::{DocumentRef, ElementRef, ModuleRef};
use crate::error::TransportError;
use crate::fetch::Response;

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// An inserted `<script>`/`<link>` element, or an HTML target that received content.
    Element(ElementRef),
    /// An HTML fragment parsed into a detached document.
    Document(DocumentRef),
    /// A module resolved through the host module loader.
    Module(ModuleRef),
    /// A raw fetch response.
    Response(Response),
    /// Fetched HTML text, when no DOM is available to parse it.
    Text(String),
    /// A script imported into the current worker scope.
    Imported,
}

impl Resource {
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Resource::Response(r) => Some(r),
            _ => None,
        }
    }
}

/// Passed to a completion callback once a load settles.
#[derive(Debug)]
pub struct Completion {
    /// Final URL (prefix and suffix applied).
    pub url: String,
    pub outcome: Result<Resource, TransportError>,
}

impl Completion {
    pub fn ok(url: impl Into<String>, resource: Resource) -> Self {
        Self {
            url: url.into(),
            outcome: Ok(resource),
        }
    }

    pub fn failed(url: impl Into<String>, err: TransportError) -> Self {
        Self {
            url: url.into(),
            outcome: Err(err),
        }
    }

    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.outcome.as_ref().ok()
    }
}
