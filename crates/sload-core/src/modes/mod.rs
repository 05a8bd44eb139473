//! Loading modes: one strategy per category of resource.
//!
//! Each built-in mode follows the same sequence:
//! 1. gather effective options from the call arguments and the settings document
//! 2. compose the final URL from prefix, url and suffix
//! 3. claim the URL in the registry cache (returning early if already loaded)
//! 4. perform the host effect
//! 5. record the URL and notify the completion callback

mod css;
mod data;
mod element;
mod html;
mod js;
mod opts;

use crate::env::Requirement;
use crate::error::{LoaderError, TransportError};
use crate::registry::{ModeTables, OptionTables};
use crate::resource::Resource;
use crate::settings::Settings;
use crate::value::Value;

pub use css::StyleMode;
pub use data::DataMode;
pub use html::HtmlMode;
pub use js::ScriptMode;
pub use opts::LoadOptions;

/// Mode sentinel meaning "pick the handler from the URL".
pub const AUTO: &str = "auto";

/// What a mode's `load` produced.
#[derive(Debug)]
pub enum LoadOutcome {
    /// An element was inserted (or already had been); completion is signalled via the callback.
    Chained,
    /// A fetched or resolved resource, fresh or from the cache.
    Resolved(Resource),
    Rejected(TransportError),
    /// The host lacks a capability this mode needs; nothing happened.
    Unsupported,
}

impl LoadOutcome {
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            LoadOutcome::Resolved(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, LoadOutcome::Rejected(_))
    }
}

/// A loading strategy.
pub trait Mode: Send + Sync {
    /// Unique key within a registry.
    fn name(&self) -> &str;

    /// Does `url` belong to this mode when no mode is pinned?
    fn handles(&self, url: &str, doc: &Settings) -> bool;

    /// Load using `doc` as the option baseline. `args` are the call's positional
    /// arguments (a single URL string when invoked by the dispatcher).
    fn load(&self, doc: &Settings, args: &[Value]) -> Result<LoadOutcome, LoaderError>;

    /// A fallback only receives URLs no other mode handles.
    fn is_fallback(&self) -> bool {
        false
    }

    /// Host capabilities needed before `load` may run.
    fn requires(&self) -> Requirement {
        Requirement::None
    }

    /// Options, validators and auto-detect candidates this mode adds.
    fn contributions(&self) -> ModeTables {
        ModeTables::default()
    }

    /// Registration hook. Override to merge contributions in a non-standard way.
    fn setup(&self, tables: &mut OptionTables) {
        tables.merge(self.name(), self.contributions());
    }
}

/// Prefix `url` unless it is rooted or absolute; append `suffix` unless already present.
pub fn compose_url(url: &str, prefix: &str, suffix: &str) -> String {
    let mut out = String::new();
    if !prefix.is_empty() && !url.starts_with('/') && !url.contains("://") {
        out.push_str(prefix);
    }
    out.push_str(url);
    if !suffix.is_empty() && !out.ends_with(suffix) {
        out.push_str(suffix);
    }
    out
}
