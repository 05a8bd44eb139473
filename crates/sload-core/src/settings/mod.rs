//! Settings documents.
//!
//! A [`Settings`] is a bag of option values bound to the [`Registry`] whose
//! validators and defaults govern it. Documents are cheap to clone and a
//! clone never shares option storage with its source, so a single load call
//! can tweak options without touching the caller's long-lived document.

mod dispatch;

use std::fmt;
use std::sync::Arc;

use crate::error::LoaderError;
use crate::modes::AUTO;
use crate::registry::{Registry, Verdict};
use crate::value::{Options, Value};

#[derive(Clone)]
pub struct Settings {
    registry: Arc<Registry>,
    values: Options,
}

impl Settings {
    /// A document holding the registry's merged defaults.
    pub fn new(registry: Arc<Registry>) -> Self {
        let values = registry.defaults().clone();
        Self { registry, values }
    }

    /// A document holding exactly `values`, unvalidated.
    pub fn with_values(registry: Arc<Registry>, values: Options) -> Self {
        Self { registry, values }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn values(&self) -> &Options {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Pinned mode name, or [`AUTO`].
    pub fn mode(&self) -> &str {
        self.get("mode").and_then(Value::as_str).unwrap_or(AUTO)
    }

    /// Whether `set` validates by default.
    pub fn validate(&self) -> bool {
        self.get("validate")
            .and_then(Value::as_bool)
            .unwrap_or(self.registry.config().validate)
    }

    /// Apply every key of `options` (which must be a map).
    ///
    /// `validate` falls back to [`Settings::validate`]. Rejected values are
    /// reported and leave the option untouched; unknown keys are reported
    /// only when `report_unknown` is set.
    pub fn set(
        &mut self,
        options: &Value,
        validate: Option<bool>,
        report_unknown: bool,
    ) -> Result<&mut Self, LoaderError> {
        let Some(map) = options.as_map() else {
            return Err(LoaderError::Configuration(format!(
                "set() expects an option map, got {}",
                options.kind()
            )));
        };
        Ok(self.set_options(map, validate, report_unknown))
    }

    /// Map-typed form of [`Settings::set`]; cannot fail.
    pub fn set_options(
        &mut self,
        options: &Options,
        validate: Option<bool>,
        report_unknown: bool,
    ) -> &mut Self {
        let validate = validate.unwrap_or_else(|| self.validate());
        let reserved = self.reserved_keys();

        for (prop, value) in options {
            if reserved.contains(prop) {
                continue;
            }
            if !validate {
                self.values.insert(prop.clone(), value.clone());
                continue;
            }
            match self.registry.validate_prop(prop, value, true, report_unknown) {
                Verdict::Accept => {
                    self.values.insert(prop.clone(), value.clone());
                }
                Verdict::Replace(coerced) => {
                    self.values.insert(prop.clone(), coerced);
                }
                Verdict::Reject => {}
            }
        }
        self
    }

    /// Restore every option to the registry's merged defaults, unvalidated.
    pub fn reset(&mut self) -> &mut Self {
        let defaults = self.registry.defaults().clone();
        self.set_options(&defaults, Some(false), true)
    }

    /// Assign a bare positional value to the first auto-detect candidate
    /// that accepts it, returning that option's name.
    pub fn set_value(&mut self, value: &Value) -> Option<String> {
        let registry = Arc::clone(&self.registry);
        let candidates = registry.tables().auto_props_for(self.mode());
        for prop in candidates {
            match registry.validate_prop(prop, value, false, false) {
                Verdict::Accept => {
                    self.values.insert(prop.clone(), value.clone());
                    return Some(prop.clone());
                }
                Verdict::Replace(coerced) => {
                    self.values.insert(prop.clone(), coerced);
                    return Some(prop.clone());
                }
                Verdict::Reject => {}
            }
        }
        None
    }

    /// Snapshot of the named options. Every name must be a string; absent
    /// options come back as null.
    pub fn extract(&self, names: &[Value]) -> Result<Options, LoaderError> {
        let mut out = Options::new();
        for name in names {
            let Some(name) = name.as_str() else {
                return Err(LoaderError::Configuration(format!(
                    "option names must be strings, got {}",
                    name.kind()
                )));
            };
            out.insert(name.to_string(), self.get(name).cloned().unwrap_or_default());
        }
        Ok(out)
    }

    pub fn extract_keys(&self, names: &[&str]) -> Options {
        names
            .iter()
            .map(|name| (name.to_string(), self.get(name).cloned().unwrap_or_default()))
            .collect()
    }

    /// Keys that name a nested group rather than an option.
    fn reserved_keys(&self) -> Vec<String> {
        let config = self.registry.config();
        let mut reserved = Vec::new();
        if config.use_mode_groups {
            reserved.extend(self.registry.mode_names());
        }
        if config.use_sets_groups {
            reserved.extend(self.registry.preset_names());
        }
        reserved
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("mode", &self.mode())
            .field("values", &self.values)
            .finish()
    }
}
