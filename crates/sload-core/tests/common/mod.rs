//! Host fakes shared by the integration tests: a recording document, a stub
//! fetch, stub module and script primitives, and a tiny HTTP server.

#![allow(dead_code)]

pub mod http_server;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use sload_core::env::{
    DocumentRef, Dom, DomEvent, ElementRef, Fetch, Hook, ModuleLoader, ModuleRef, ScriptImporter,
};
use sload_core::fetch::{FetchInit, Response};
use sload_core::{Callback, Completion, TransportError, Value};

pub const HEAD: ElementRef = ElementRef::new(0);

/// One call made against [`RecordingDom`].
#[derive(Debug, Clone, PartialEq)]
pub enum DomOp {
    Create(ElementRef, String),
    Prop(ElementRef, String, Value),
    Attr(ElementRef, String, String),
    Listen(ElementRef, DomEvent),
    Append(ElementRef, ElementRef),
    InnerHtml(ElementRef, String),
    Parse(DocumentRef, String, bool, i64),
}

/// Document fake that records every call and lets tests fire element events.
#[derive(Default)]
pub struct RecordingDom {
    next_id: AtomicU64,
    ops: Mutex<Vec<DomOp>>,
    hooks: Mutex<Vec<(ElementRef, DomEvent, Hook)>>,
}

impl RecordingDom {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record(&self, op: DomOp) {
        self.ops.lock().unwrap().push(op);
    }

    pub fn ops(&self) -> Vec<DomOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Elements created with `tag`, in creation order.
    pub fn created(&self, tag: &str) -> Vec<ElementRef> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                DomOp::Create(el, t) if t == tag => Some(el),
                _ => None,
            })
            .collect()
    }

    /// Last value assigned to property `name` of `el`.
    pub fn prop(&self, el: ElementRef, name: &str) -> Option<Value> {
        self.ops().into_iter().rev().find_map(|op| match op {
            DomOp::Prop(e, n, v) if e == el && n == name => Some(v),
            _ => None,
        })
    }

    pub fn attr(&self, el: ElementRef, name: &str) -> Option<String> {
        self.ops().into_iter().rev().find_map(|op| match op {
            DomOp::Attr(e, n, v) if e == el && n == name => Some(v),
            _ => None,
        })
    }

    pub fn parent_of(&self, el: ElementRef) -> Option<ElementRef> {
        self.ops().into_iter().find_map(|op| match op {
            DomOp::Append(parent, child) if child == el => Some(parent),
            _ => None,
        })
    }

    /// Run the hooks registered for `event` on `el`.
    pub fn fire(&self, el: ElementRef, event: DomEvent) {
        let hooks = self.hooks.lock().unwrap();
        for (e, ev, hook) in hooks.iter() {
            if *e == el && *ev == event {
                hook();
            }
        }
    }
}

impl Dom for RecordingDom {
    fn head(&self) -> Option<ElementRef> {
        Some(HEAD)
    }

    fn create_element(&self, tag: &str) -> ElementRef {
        let el = ElementRef::new(self.next());
        self.record(DomOp::Create(el, tag.to_string()));
        el
    }

    fn set_property(&self, el: ElementRef, name: &str, value: &Value) {
        self.record(DomOp::Prop(el, name.to_string(), value.clone()));
    }

    fn set_attribute(&self, el: ElementRef, name: &str, value: &str) {
        self.record(DomOp::Attr(el, name.to_string(), value.to_string()));
    }

    fn add_listener(&self, el: ElementRef, event: DomEvent, hook: Hook) {
        self.record(DomOp::Listen(el, event));
        self.hooks.lock().unwrap().push((el, event, hook));
    }

    fn append_child(&self, parent: ElementRef, child: ElementRef) {
        self.record(DomOp::Append(parent, child));
    }

    fn set_inner_html(&self, el: ElementRef, html: &str) {
        self.record(DomOp::InnerHtml(el, html.to_string()));
    }

    fn parse_html(&self, html: &str, extend_queries: bool, mode: i64) -> DocumentRef {
        let doc = DocumentRef::new(self.next());
        self.record(DomOp::Parse(doc, html.to_string(), extend_queries, mode));
        doc
    }
}

/// Fetch fake. Every URL answers `body of <url>` unless told to fail.
#[derive(Default)]
pub struct StubFetch {
    calls: Mutex<Vec<(String, FetchInit)>>,
    failures: Mutex<HashMap<String, u32>>,
    bodies: Mutex<HashMap<String, String>>,
    delay: Option<Duration>,
}

impl StubFetch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Each fetch sleeps for `delay` before answering.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn fail(&self, url: &str, status: u32) {
        self.failures.lock().unwrap().insert(url.to_string(), status);
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn inits(&self) -> Vec<FetchInit> {
        self.calls.lock().unwrap().iter().map(|(_, i)| i.clone()).collect()
    }
}

impl Fetch for StubFetch {
    fn fetch(&self, url: &str, init: &FetchInit) -> Result<Response, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), init.clone()));
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if let Some(status) = self.failures.lock().unwrap().get(url) {
            return Err(TransportError::Http(*status));
        }
        let body = self
            .bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| format!("body of {url}"));
        Ok(Response {
            url: url.to_string(),
            status: 200,
            headers: Default::default(),
            body: body.into_bytes(),
        })
    }
}

/// Module loader fake handing out sequential ids.
#[derive(Default)]
pub struct StubModules {
    resolved: Mutex<Vec<String>>,
}

impl StubModules {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }
}

impl ModuleLoader for StubModules {
    fn resolve(&self, specifier: &str) -> Result<ModuleRef, TransportError> {
        let mut resolved = self.resolved.lock().unwrap();
        resolved.push(specifier.to_string());
        Ok(ModuleRef {
            specifier: specifier.to_string(),
            id: resolved.len() as u64,
        })
    }
}

#[derive(Default)]
pub struct StubScripts {
    imported: Mutex<Vec<String>>,
}

impl StubScripts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn imported(&self) -> Vec<String> {
        self.imported.lock().unwrap().clone()
    }
}

impl ScriptImporter for StubScripts {
    fn import_scripts(&self, url: &str) -> Result<(), TransportError> {
        self.imported.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// What a completion callback saw.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub url: String,
    pub success: bool,
    pub status: Option<u32>,
}

/// A callback that records every completion, plus the log it writes to.
pub fn recorder() -> (Callback, Arc<Mutex<Vec<Seen>>>) {
    let log: Arc<Mutex<Vec<Seen>>> = Arc::default();
    let sink = Arc::clone(&log);
    let cb = Callback::new(move |c: &Completion| {
        sink.lock().unwrap().push(Seen {
            url: c.url.clone(),
            success: c.success(),
            status: c.outcome.as_ref().err().and_then(TransportError::status),
        });
    });
    (cb, log)
}
