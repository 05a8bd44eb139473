//! Host capabilities consumed by modes.
//!
//! The loader never touches a document, the network or a module system
//! itself; it is handed an [`Environment`] holding whichever primitives the
//! host provides. Modes declare a [`Requirement`] over [`Capabilities`] and the
//! dispatcher checks it before invoking them.

mod dom;

use std::fmt;
use std::sync::Arc;

use crate::error::TransportError;
use crate::fetch::{FetchInit, Response};

pub use dom::{DocumentRef, Dom, DomEvent, ElementRef, Hook};

bitflags::bitflags! {
    /// A set of host capabilities.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Element creation and insertion in a live document.
        const DOM = 1 << 0;
        const FETCH = 1 << 1;
        const MODULES = 1 << 2;
        /// Synchronous script import (worker contexts).
        const SCRIPT_IMPORT = 1 << 3;
    }
}

/// What a mode needs from the host before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    #[default]
    None,
    /// Every listed capability must be present.
    All(Capabilities),
    /// At least one listed capability must be present.
    Any(Capabilities),
}

impl Requirement {
    pub fn satisfied_by(self, caps: Capabilities) -> bool {
        match self {
            Requirement::None => true,
            Requirement::All(need) => caps.contains(need),
            Requirement::Any(need) => need.is_empty() || caps.intersects(need),
        }
    }
}

/// Network primitive.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str, init: &FetchInit) -> Result<Response, TransportError>;
}

/// Opaque handle to a module resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    pub specifier: String,
    pub id: u64,
}

/// Host module system.
pub trait ModuleLoader: Send + Sync {
    fn resolve(&self, specifier: &str) -> Result<ModuleRef, TransportError>;
}

/// Worker-style synchronous script import.
pub trait ScriptImporter: Send + Sync {
    fn import_scripts(&self, url: &str) -> Result<(), TransportError>;
}

/// The primitives available to modes in this process.
#[derive(Clone, Default)]
pub struct Environment {
    dom: Option<Arc<dyn Dom>>,
    fetch: Option<Arc<dyn Fetch>>,
    modules: Option<Arc<dyn ModuleLoader>>,
    scripts: Option<Arc<dyn ScriptImporter>>,
}

impl Environment {
    /// An environment with no capabilities at all.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dom(mut self, dom: Arc<dyn Dom>) -> Self {
        self.dom = Some(dom);
        self
    }

    pub fn with_fetch(mut self, fetch: Arc<dyn Fetch>) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn with_modules(mut self, modules: Arc<dyn ModuleLoader>) -> Self {
        self.modules = Some(modules);
        self
    }

    pub fn with_script_importer(mut self, scripts: Arc<dyn ScriptImporter>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    pub fn dom(&self) -> Option<&Arc<dyn Dom>> {
        self.dom.as_ref()
    }

    pub fn fetch(&self) -> Option<&Arc<dyn Fetch>> {
        self.fetch.as_ref()
    }

    pub fn modules(&self) -> Option<&Arc<dyn ModuleLoader>> {
        self.modules.as_ref()
    }

    pub fn scripts(&self) -> Option<&Arc<dyn ScriptImporter>> {
        self.scripts.as_ref()
    }

    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::DOM, self.dom.is_some());
        caps.set(Capabilities::FETCH, self.fetch.is_some());
        caps.set(Capabilities::MODULES, self.modules.is_some());
        caps.set(Capabilities::SCRIPT_IMPORT, self.scripts.is_some());
        caps
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoFetch;

    impl Fetch for NoFetch {
        fn fetch(&self, _url: &str, _init: &FetchInit) -> Result<Response, TransportError> {
            Err(TransportError::Other("offline".into()))
        }
    }

    #[test]
    fn capabilities_follow_installed_primitives() {
        let env = Environment::new();
        assert!(env.capabilities().is_empty());
        let env = env.with_fetch(Arc::new(NoFetch));
        assert_eq!(env.capabilities(), Capabilities::FETCH);
    }

    #[test]
    fn requirement_all_and_any() {
        let caps = Capabilities::FETCH | Capabilities::MODULES;
        assert!(Requirement::None.satisfied_by(Capabilities::empty()));
        assert!(Requirement::All(Capabilities::FETCH).satisfied_by(caps));
        assert!(!Requirement::All(Capabilities::FETCH | Capabilities::DOM).satisfied_by(caps));
        assert!(Requirement::Any(Capabilities::DOM | Capabilities::MODULES).satisfied_by(caps));
        assert!(!Requirement::Any(Capabilities::DOM | Capabilities::SCRIPT_IMPORT).satisfied_by(caps));
    }
}
