//! Option tables: defaults, validators, hints and auto-detect lists.
//!
//! The registry owns one merged [`OptionTables`]; each mode contributes a
//! [`ModeTables`] that is folded into it at registration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::{Options, Value};

use super::Registry;

/// Acceptance test for an option value.
pub type Predicate = Arc<dyn Fn(&Value, &Registry) -> bool + Send + Sync>;

/// Optional fallback that turns a rejected value into an acceptable replacement.
pub type Coercion = Arc<dyn Fn(&Value, &Registry) -> Option<Value> + Send + Sync>;

/// Outcome of validating one option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accept,
    /// Accept this value instead of the one supplied.
    Replace(Value),
    Reject,
}

/// Validator for a single option: a pure predicate plus an optional coercion.
#[derive(Clone)]
pub struct Validator {
    accepts: Predicate,
    coerce: Option<Coercion>,
}

impl Validator {
    pub fn new<F>(accepts: F) -> Self
    where
        F: Fn(&Value, &Registry) -> bool + Send + Sync + 'static,
    {
        Self {
            accepts: Arc::new(accepts),
            coerce: None,
        }
    }

    pub fn with_coercion<F>(mut self, coerce: F) -> Self
    where
        F: Fn(&Value, &Registry) -> Option<Value> + Send + Sync + 'static,
    {
        self.coerce = Some(Arc::new(coerce));
        self
    }

    /// The predicate runs first; the coercion is only consulted for values it rejects.
    pub fn check(&self, value: &Value, registry: &Registry) -> Verdict {
        if (self.accepts)(value, registry) {
            return Verdict::Accept;
        }
        match self.coerce.as_ref().and_then(|c| c(value, registry)) {
            Some(replacement) => Verdict::Replace(replacement),
            None => Verdict::Reject,
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("coerces", &self.coerce.is_some())
            .finish()
    }
}

/// Everything a mode contributes to the registry's option tables. All parts are optional.
#[derive(Debug, Clone, Default)]
pub struct ModeTables {
    pub defaults: Options,
    /// Options always propagated when a mode gathers its effective options.
    pub default_opts: Vec<String>,
    pub validators: BTreeMap<String, Validator>,
    pub validation_msgs: BTreeMap<String, String>,
    /// Ordered candidates for a bare positional value while this mode is pinned.
    pub auto_props: Option<Vec<String>>,
}

impl ModeTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option with its default, validator and hint in one go.
    pub fn option(
        mut self,
        name: &str,
        default: impl Into<Value>,
        validator: Validator,
        msg: &str,
    ) -> Self {
        self.defaults.insert(name.to_string(), default.into());
        self.validators.insert(name.to_string(), validator);
        self.validation_msgs.insert(name.to_string(), msg.to_string());
        self
    }

    pub fn auto_props(mut self, props: &[&str]) -> Self {
        self.auto_props = Some(props.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn default_opts(mut self, opts: &[&str]) -> Self {
        self.default_opts.extend(opts.iter().map(|o| o.to_string()));
        self
    }
}

/// Merged option tables held by a registry.
#[derive(Debug, Clone, Default)]
pub struct OptionTables {
    pub defaults: Options,
    /// Filled from the global document when a mode is handed an explicit option map.
    pub default_opts: Vec<String>,
    pub validators: BTreeMap<String, Validator>,
    pub validation_msgs: BTreeMap<String, String>,
    /// Keyed by mode name, plus the `default` list used when no pinned mode has its own.
    pub auto_props: BTreeMap<String, Vec<String>>,
}

impl OptionTables {
    /// Standard merge of a mode's contributions. Later entries overwrite
    /// earlier ones; `default_opts` only grows.
    pub fn merge(&mut self, mode_name: &str, tables: ModeTables) {
        if let Some(props) = tables.auto_props {
            self.auto_props.insert(mode_name.to_string(), props);
        }
        self.defaults.extend(tables.defaults);
        self.validators.extend(tables.validators);
        self.validation_msgs.extend(tables.validation_msgs);
        for opt in tables.default_opts {
            if !self.default_opts.contains(&opt) {
                self.default_opts.push(opt);
            }
        }
    }

    /// Candidate list for `mode`, falling back to the `default` list.
    pub fn auto_props_for(&self, mode: &str) -> &[String] {
        self.auto_props
            .get(mode)
            .or_else(|| self.auto_props.get(super::DEFAULT_PRESET))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
