//! Mode registry.
//!
//! A registry owns the registered modes (in registration order), the merged
//! option tables they contribute, the named settings presets and the per-mode
//! load cache. It is built with `&mut` access while modes are registered, then
//! shared as `Arc<Registry>` by every settings document derived from it.

mod cache;
mod shape;
mod tables;
pub mod validators;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::RegistryConfig;
use crate::env::Environment;
use crate::error::LoaderError;
use crate::modes::{Mode, AUTO};
use crate::settings::Settings;
use crate::value::{Options, Value};

pub use cache::{Claim, ClaimGuard, LoadCache};
pub use tables::{Coercion, ModeTables, OptionTables, Predicate, Validator, Verdict};

/// Name of the preset backing the entry point; always present.
pub const DEFAULT_PRESET: &str = "default";

pub struct Registry {
    env: Environment,
    config: RegistryConfig,
    modes: Vec<Arc<dyn Mode>>,
    tables: OptionTables,
    presets: RwLock<BTreeMap<String, Options>>,
    cache: LoadCache,
}

impl Registry {
    /// Build a registry with the base option tables and an empty `default` preset.
    pub fn new(env: Environment, config: RegistryConfig) -> Self {
        let tables = base_tables(&env, &config);
        let mut presets = BTreeMap::new();
        presets.insert(DEFAULT_PRESET.to_string(), Options::new());
        Self {
            env,
            config,
            modes: Vec::new(),
            tables,
            presets: RwLock::new(presets),
            cache: LoadCache::new(),
        }
    }

    /// Register `mode`.
    ///
    /// With `validate`, the mode's shape is checked first; a failure is an
    /// error when `strict`, otherwise the mode is skipped and `Ok(false)` is
    /// returned. Registering a name twice replaces the earlier mode in place.
    pub fn register(
        &mut self,
        mode: Arc<dyn Mode>,
        validate: bool,
        strict: bool,
    ) -> Result<bool, LoaderError> {
        if validate {
            if let Err(err) = shape::check_mode(mode.as_ref(), &self.tables) {
                if strict {
                    return Err(err);
                }
                tracing::warn!(mode = mode.name(), error = %err, "mode skipped");
                return Ok(false);
            }
        }

        let name = mode.name().to_string();
        match self.modes.iter().position(|m| m.name() == name) {
            Some(i) => self.modes[i] = Arc::clone(&mode),
            None => self.modes.push(Arc::clone(&mode)),
        }
        self.cache.init_mode(&name);
        mode.setup(&mut self.tables);
        tracing::debug!(mode = %name, "mode registered");
        Ok(true)
    }

    /// The last registered mode whose `handles` predicate accepts `url`.
    /// Fallback modes are only considered when no other mode matches.
    pub fn find_handler(&self, url: &str, doc: &Settings) -> Option<&Arc<dyn Mode>> {
        let mut found = None;
        let mut fallback = None;
        for mode in self.modes.iter().filter(|m| m.handles(url, doc)) {
            if mode.is_fallback() {
                fallback = Some(mode);
            } else {
                found = Some(mode);
            }
        }
        found.or(fallback)
    }

    pub fn mode(&self, name: &str) -> Option<&Arc<dyn Mode>> {
        self.modes.iter().find(|m| m.name() == name)
    }

    pub fn has_mode(&self, name: &str) -> bool {
        self.mode(name).is_some()
    }

    /// Registered modes in registration order.
    pub fn modes(&self) -> &[Arc<dyn Mode>] {
        &self.modes
    }

    pub fn mode_names(&self) -> Vec<String> {
        self.modes.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn tables(&self) -> &OptionTables {
        &self.tables
    }

    /// Merged default option table.
    pub fn defaults(&self) -> &Options {
        &self.tables.defaults
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }

    /// Run the validator for `prop` against `value`.
    ///
    /// Options with no validator are rejected. Diagnostics are emitted for
    /// rejected values when `report_invalid` and for unknown options when
    /// `report_unknown`.
    pub fn validate_prop(
        &self,
        prop: &str,
        value: &Value,
        report_invalid: bool,
        report_unknown: bool,
    ) -> Verdict {
        let Some(validator) = self.tables.validators.get(prop) else {
            if report_unknown {
                tracing::warn!(setting = prop, value = %value.to_json(), "unknown setting");
            }
            return Verdict::Reject;
        };
        let verdict = validator.check(value, self);
        if report_invalid && verdict == Verdict::Reject {
            tracing::warn!(
                setting = prop,
                value = %value.to_json(),
                hint = %self.hint(prop),
                "invalid value for setting"
            );
        }
        verdict
    }

    fn hint(&self, prop: &str) -> String {
        if prop == "mode" {
            return format!("Must be one of: {}, {}", AUTO, self.mode_names().join(", "));
        }
        self.tables
            .validation_msgs
            .get(prop)
            .cloned()
            .unwrap_or_default()
    }

    /// Register a named preset. The document must come from this registry.
    pub fn add_preset(&self, name: &str, doc: &Settings) -> Result<(), LoaderError> {
        let mut presets = self.presets.write().unwrap_or_else(PoisonError::into_inner);
        if presets.contains_key(name) {
            return Err(LoaderError::DuplicateName(name.to_string()));
        }
        if !std::ptr::eq(Arc::as_ptr(doc.registry()), self) {
            return Err(LoaderError::TypeMismatch(name.to_string()));
        }
        presets.insert(name.to_string(), doc.values().clone());
        tracing::debug!(preset = name, "preset registered");
        Ok(())
    }

    /// Rebuild the named preset as a settings document bound to this registry.
    pub fn preset(self: &Arc<Self>, name: &str) -> Option<Settings> {
        let values = self
            .presets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()?;
        Some(Settings::with_values(Arc::clone(self), values))
    }

    /// Value of `opt` in the `default` preset, or its registered default.
    pub fn global_value(&self, opt: &str) -> Option<Value> {
        let presets = self.presets.read().unwrap_or_else(PoisonError::into_inner);
        presets
            .get(DEFAULT_PRESET)
            .and_then(|values| values.get(opt))
            .or_else(|| self.tables.defaults.get(opt))
            .cloned()
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.presets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Overwrite an existing preset's values (used by the entry point's `set`/`reset`).
    pub(crate) fn store_preset(&self, name: &str, values: Options) {
        self.presets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), values);
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("modes", &self.mode_names())
            .field("presets", &self.preset_names())
            .field("config", &self.config)
            .field("env", &self.env)
            .finish()
    }
}

/// Base entries every registry starts from, before any mode is merged in.
fn base_tables(env: &Environment, config: &RegistryConfig) -> OptionTables {
    let head = env.dom().and_then(|dom| dom.head());
    let loc_hint = if env.dom().is_some() {
        "Must be a DOM element"
    } else {
        "Is not supported in this context"
    };

    let mut tables = OptionTables::default();
    tables.merge(
        DEFAULT_PRESET,
        ModeTables::new()
            .option("mode", AUTO, validators::mode_name(), "")
            .option("func", Value::Null, validators::func_or_null(), validators::MUST_FUNC)
            .option("loc", Value::from(head), validators::element(), loc_hint)
            .option("validate", config.validate, validators::is_bool(), validators::MUST_BOOL)
            .option("usePromise", config.use_promise, validators::is_bool(), validators::MUST_BOOL)
            .option(
                "useReadyState",
                config.use_ready_state,
                validators::is_bool(),
                validators::MUST_BOOL,
            )
            .option("useOnLoad", config.use_on_load, validators::is_bool(), validators::MUST_BOOL)
            .default_opts(&["usePromise", "useReadyState", "useOnLoad"])
            .auto_props(&["mode", "func", "loc"]),
    );
    tables.validators.insert("target".to_string(), validators::element());
    tables
        .validation_msgs
        .insert("target".to_string(), loc_hint.to_string());
    tables
}
