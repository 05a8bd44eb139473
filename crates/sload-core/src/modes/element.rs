//! Shared `<script>`/`<link>` insertion for the DOM-based modes.

use crate::env::{Dom, DomEvent, ElementRef, Hook};
use crate::resource::{Completion, Resource};
use crate::value::{Callback, Value};

use super::opts::LoadOptions;

/// How to build one element.
pub(super) struct ElementSpec<'a> {
    pub tag: &'a str,
    pub props_key: &'a str,
    pub attrs_key: &'a str,
    /// Properties always assigned after the caller's, e.g. `rel=stylesheet`.
    pub fixed: &'a [(&'a str, &'a str)],
    /// Property receiving the URL (`src` or `href`).
    pub url_prop: &'a str,
}

fn attr_text(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_json().to_string(),
    }
}

fn completion_hook(func: &Callback, url: &str, el: ElementRef) -> Hook {
    let func = func.clone();
    let url = url.to_string();
    Box::new(move || func.call(&Completion::ok(url.clone(), Resource::Element(el))))
}

/// Create the element, wire completion hooks and append it to `loc` (or the head).
///
/// With neither `useOnLoad` nor `useReadyState`, the callback fires right
/// after insertion.
pub(super) fn inject(dom: &dyn Dom, opts: &LoadOptions, spec: &ElementSpec<'_>, url: &str) -> ElementRef {
    let el = dom.create_element(spec.tag);

    if let Some(props) = opts.map(spec.props_key) {
        for (name, value) in props {
            dom.set_property(el, name, value);
        }
    }
    if let Some(attrs) = opts.map(spec.attrs_key) {
        for (name, value) in attrs {
            dom.set_attribute(el, name, &attr_text(value));
        }
    }
    for (name, value) in spec.fixed {
        dom.set_property(el, name, &Value::from(*value));
    }

    let on_load = opts.flag("useOnLoad");
    let ready_state = opts.flag("useReadyState");
    if let Some(func) = opts.func() {
        if on_load {
            dom.add_listener(el, DomEvent::Load, completion_hook(func, url, el));
        }
        if ready_state {
            dom.add_listener(el, DomEvent::ReadyStateChange, completion_hook(func, url, el));
        }
    }

    dom.set_property(el, spec.url_prop, &Value::from(url));
    match opts.loc().or_else(|| dom.head()) {
        Some(parent) => dom.append_child(parent, el),
        None => tracing::warn!(url, tag = spec.tag, "no insertion point for element"),
    }

    if !on_load && !ready_state {
        opts.notify(&Completion::ok(url, Resource::Element(el)));
    }
    el
}
