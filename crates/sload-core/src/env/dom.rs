//! Document capability: element creation, insertion and HTML parsing.

use crate::value::Value;

/// Opaque handle to an element owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(u64);

impl ElementRef {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Opaque handle to a parsed, detached document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentRef(u64);

impl DocumentRef {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Element events a mode can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Load,
    ReadyStateChange,
}

/// Listener installed on an element; the host calls it when the event fires.
pub type Hook = Box<dyn Fn() + Send + Sync>;

/// Element-level document primitives.
pub trait Dom: Send + Sync {
    /// Default insertion point (`document.head`).
    fn head(&self) -> Option<ElementRef>;

    fn create_element(&self, tag: &str) -> ElementRef;

    /// Assign a JS-style property (`script.async = true`).
    fn set_property(&self, el: ElementRef, name: &str, value: &Value);

    fn set_attribute(&self, el: ElementRef, name: &str, value: &str);

    fn add_listener(&self, el: ElementRef, event: DomEvent, hook: Hook);

    fn append_child(&self, parent: ElementRef, child: ElementRef);

    fn set_inner_html(&self, el: ElementRef, html: &str);

    /// Parse HTML text into a detached document. `extend_queries` and `mode`
    /// are forwarded to the host's HTML helper untouched.
    fn parse_html(&self, html: &str, extend_queries: bool, mode: i64) -> DocumentRef;
}
