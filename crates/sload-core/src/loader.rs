//! The loader entry point.
//!
//! A [`Loader`] wraps a shared registry and its `default` preset. `load`
//! always works on a clone of that preset; `set` and `reset` write back to it.

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::env::Environment;
use crate::error::LoaderError;
use crate::modes::{DataMode, HtmlMode, LoadOutcome, ScriptMode, StyleMode};
use crate::registry::{Registry, DEFAULT_PRESET};
use crate::settings::Settings;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Loader {
    registry: Arc<Registry>,
}

impl Loader {
    /// Wrap a fully registered `registry` and reset its default preset.
    pub fn new(registry: Registry) -> Self {
        let loader = Self {
            registry: Arc::new(registry),
        };
        loader.reset();
        loader
    }

    /// Registry with the built-in modes: `js`, then `css` and `html` when the
    /// host has a DOM, then the `data` fallback.
    pub fn standard(env: Environment, config: RegistryConfig) -> Result<Self, LoaderError> {
        let has_dom = env.dom().is_some();
        let mut registry = Registry::new(env, config);
        registry.register(Arc::new(ScriptMode), true, true)?;
        if has_dom {
            registry.register(Arc::new(StyleMode), true, true)?;
            registry.register(Arc::new(HtmlMode), true, true)?;
        }
        registry.register(Arc::new(DataMode), true, true)?;
        Ok(Self::new(registry))
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// A copy of the default document.
    pub fn settings(&self) -> Settings {
        self.registry
            .preset(DEFAULT_PRESET)
            .unwrap_or_else(|| Settings::new(Arc::clone(&self.registry)))
    }

    /// Load `args` against a clone of the default document and return that clone.
    pub fn load(&self, args: &[Value]) -> Settings {
        self.settings().load_from(args)
    }

    /// Change options on the default document.
    pub fn set(&self, options: &Value, validate: Option<bool>) -> Result<Settings, LoaderError> {
        let mut doc = self.settings();
        doc.set(options, validate, true)?;
        self.registry.store_preset(DEFAULT_PRESET, doc.values().clone());
        Ok(doc)
    }

    /// Restore the default document to the registry's defaults.
    pub fn reset(&self) -> Settings {
        let mut doc = self.settings();
        doc.reset();
        self.registry.store_preset(DEFAULT_PRESET, doc.values().clone());
        doc
    }

    /// Register a named preset derived from `parent` (the default document
    /// when `None`) with `opts` applied through the dispatcher.
    pub fn add_preset(
        &self,
        name: &str,
        opts: &Value,
        parent: Option<&Settings>,
    ) -> Result<Settings, LoaderError> {
        if opts.as_map().is_none() {
            return Err(LoaderError::Configuration(format!(
                "preset {name} needs an option map, got {}",
                opts.kind()
            )));
        }
        let doc = match parent {
            Some(parent) => parent.load_from(std::slice::from_ref(opts)),
            None => self.settings().load_from(std::slice::from_ref(opts)),
        };
        self.registry.add_preset(name, &doc)?;
        Ok(doc)
    }

    /// Invoke the named mode directly, skipping auto-detection.
    pub fn call(&self, mode: &str, args: &[Value]) -> Result<LoadOutcome, LoaderError> {
        let handler = self
            .registry
            .mode(mode)
            .ok_or_else(|| LoaderError::UnknownMode(mode.to_string()))?;
        if !handler.requires().satisfied_by(self.registry.env().capabilities()) {
            tracing::warn!(mode, "mode is not supported in this context");
            return Ok(LoadOutcome::Unsupported);
        }
        handler.load(&self.settings(), args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;

    #[test]
    fn standard_without_dom_registers_js_and_data() {
        let loader = Loader::standard(Environment::new(), RegistryConfig::default()).unwrap();
        assert_eq!(loader.registry().mode_names(), vec!["js", "data"]);
        assert_eq!(loader.settings().mode(), "auto");
    }

    #[test]
    fn set_writes_back_to_default_document() {
        let loader = Loader::standard(Environment::new(), RegistryConfig::default()).unwrap();
        loader
            .set(&Value::map([("jsPrefix", "/static/")]), None)
            .unwrap();
        assert_eq!(loader.settings().get("jsPrefix"), Some(&Value::from("/static/")));

        loader.reset();
        assert_eq!(loader.settings().get("jsPrefix"), Some(&Value::from("")));
    }

    #[test]
    fn set_rejects_non_map() {
        let loader = Loader::standard(Environment::new(), RegistryConfig::default()).unwrap();
        let err = loader.set(&Value::from("nope"), None).unwrap_err();
        assert!(matches!(err, LoaderError::Configuration(_)));
    }

    #[test]
    fn call_unknown_mode_is_an_error() {
        let loader = Loader::standard(Environment::new(), RegistryConfig::default()).unwrap();
        let err = loader.call("css", &[Value::from("a.css")]).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownMode(ref m) if m == "css"));
    }

    #[test]
    fn call_without_capability_is_unsupported() {
        let loader = Loader::standard(Environment::new(), RegistryConfig::default()).unwrap();
        let outcome = loader.call("data", &[Value::from("a.bin")]).unwrap();
        assert!(matches!(outcome, LoadOutcome::Unsupported));
    }
}
