//! Effective options for a single mode invocation.

use crate::env::ElementRef;
use crate::error::{LoaderError, TransportError};
use crate::resource::{Completion, Resource};
use crate::settings::Settings;
use crate::value::{Callback, Options, Value};

use super::LoadOutcome;

/// Options a mode works with for one load: the document snapshot overlaid
/// with whatever the call's arguments supplied.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    values: Options,
}

impl LoadOptions {
    /// Merge call arguments over `doc`.
    ///
    /// Precedence, highest first: an explicit option map (any map carrying a
    /// string `url`), then positional values, then the document. Positional
    /// detection takes the first string as `url`, the first callback as
    /// `func`, the first element as `loc`, and the first and second plain maps
    /// as the `props_slot` and `attrs_slot` options.
    ///
    /// An explicit option map is taken as a complete request: options listed
    /// in the registry's `default_opts` that it leaves out come from the
    /// global `default` document rather than from `doc`.
    pub fn gather(
        doc: &Settings,
        args: &[Value],
        props_slot: Option<&str>,
        attrs_slot: Option<&str>,
    ) -> Result<Self, LoaderError> {
        let mut values = doc.values().clone();
        let mut explicit: Option<&Options> = None;
        let mut url_seen = false;
        let mut func_seen = false;
        let mut loc_seen = false;
        let mut props_seen = false;
        let mut attrs_seen = false;

        for arg in args {
            match arg {
                Value::Null => {}
                Value::Str(url) if !url_seen => {
                    values.insert("url".to_string(), Value::Str(url.clone()));
                    url_seen = true;
                }
                Value::Func(_) if !func_seen => {
                    values.insert("func".to_string(), arg.clone());
                    func_seen = true;
                }
                Value::Elem(_) if !loc_seen => {
                    values.insert("loc".to_string(), arg.clone());
                    loc_seen = true;
                }
                Value::Map(map)
                    if explicit.is_none() && map.get("url").and_then(Value::as_str).is_some() =>
                {
                    explicit = Some(map);
                }
                Value::Map(_) if props_slot.is_some() && !props_seen => {
                    if let Some(slot) = props_slot {
                        values.insert(slot.to_string(), arg.clone());
                    }
                    props_seen = true;
                }
                Value::Map(_) if attrs_slot.is_some() && !attrs_seen => {
                    if let Some(slot) = attrs_slot {
                        values.insert(slot.to_string(), arg.clone());
                    }
                    attrs_seen = true;
                }
                other => {
                    tracing::warn!(kind = other.kind(), value = %other.to_json(), "unknown or invalid parameter");
                }
            }
        }

        if let Some(map) = explicit {
            let registry = doc.registry();
            for opt in &registry.tables().default_opts {
                if map.contains_key(opt) {
                    continue;
                }
                if let Some(value) = registry.global_value(opt) {
                    values.insert(opt.clone(), value);
                }
            }
            values.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if values.get("url").and_then(Value::as_str).is_none() {
            return Err(LoaderError::MissingUrl);
        }
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn url(&self) -> &str {
        self.get("url").and_then(Value::as_str).unwrap_or_default()
    }

    /// String option, or `""` when absent or not a string.
    pub fn str_or_empty(&self, name: &str) -> &str {
        self.get(name).and_then(Value::as_str).unwrap_or_default()
    }

    /// Boolean option, `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn map(&self, name: &str) -> Option<&Options> {
        self.get(name).and_then(Value::as_map)
    }

    pub fn func(&self) -> Option<&Callback> {
        self.get("func").and_then(Value::as_func)
    }

    pub fn loc(&self) -> Option<ElementRef> {
        self.get("loc").and_then(Value::as_elem).copied()
    }

    pub fn target(&self) -> Option<ElementRef> {
        self.get("target").and_then(Value::as_elem).copied()
    }

    pub fn notify(&self, completion: &Completion) {
        if let Some(func) = self.func() {
            func.call(completion);
        }
    }

    /// Hand `outcome` to the callback, then turn it into the mode's return value.
    pub fn settle(&self, url: &str, outcome: Result<Resource, TransportError>) -> LoadOutcome {
        let completion = Completion {
            url: url.to_string(),
            outcome,
        };
        self.notify(&completion);
        match completion.outcome {
            Ok(resource) => LoadOutcome::Resolved(resource),
            Err(err) => LoadOutcome::Rejected(err),
        }
    }
}
