//! The left-to-right argument dispatcher behind every load call.

use std::sync::Arc;

use crate::modes::{LoadOutcome, Mode, AUTO};
use crate::value::{Options, Value};

use super::Settings;

impl Settings {
    /// Run `args` against an independent clone of this document.
    pub fn load_from(&self, args: &[Value]) -> Settings {
        let mut doc = self.clone();
        doc.load_using(args);
        doc
    }

    /// Process `args` in order against this document.
    ///
    /// Each argument is, in turn: skipped if null; absorbed as an
    /// auto-detected option; run as an isolated nested batch if a list;
    /// applied as options (plus any mode or preset groups it carries) if a
    /// map; or taken as the URL if a string. A map with a string `url` and a
    /// bare string both dispatch to a mode. Nothing here aborts the batch.
    pub fn load_using(&mut self, args: &[Value]) -> &mut Self {
        for arg in args {
            if arg.is_null() {
                continue;
            }
            if let Some(prop) = self.set_value(arg) {
                tracing::trace!(option = %prop, "positional value absorbed");
                continue;
            }

            let url = match arg {
                Value::List(items) => {
                    self.load_from(items);
                    continue;
                }
                Value::Map(map) => {
                    let validate = self.validate();
                    self.set_options(map, Some(validate), false);
                    self.run_groups(map);
                    map.get("url").and_then(Value::as_str).map(str::to_owned)
                }
                Value::Str(url) => Some(url.clone()),
                other => {
                    tracing::warn!(kind = other.kind(), value = %other.to_json(), "unusable load argument");
                    None
                }
            };

            if let Some(url) = url {
                self.dispatch(&url);
            }
        }
        self
    }

    fn run_groups(&self, map: &Options) {
        let registry = Arc::clone(self.registry());
        let config = registry.config();

        if config.use_mode_groups {
            for name in registry.mode_names() {
                if let Some(Value::List(items)) = map.get(&name) {
                    let mut sub = self.clone();
                    let pin = Options::from([("mode".to_string(), Value::Str(name.clone()))]);
                    sub.set_options(&pin, Some(false), true);
                    sub.load_using(items);
                }
            }
        }

        if config.use_sets_groups {
            for name in registry.preset_names() {
                if let Some(Value::List(items)) = map.get(&name) {
                    match registry.preset(&name) {
                        Some(preset) => {
                            preset.load_from(items);
                        }
                        None => tracing::warn!(preset = %name, "preset vanished during dispatch"),
                    }
                }
            }
        }
    }

    /// Hand `url` to the pinned mode, or to the last registered mode that
    /// handles it when the document is in auto mode.
    fn dispatch(&self, url: &str) {
        let registry = self.registry();
        let mode: &Arc<dyn Mode> = if self.mode() == AUTO {
            match registry.find_handler(url, self) {
                Some(mode) => mode,
                None => {
                    tracing::error!(url, "no loader found");
                    return;
                }
            }
        } else {
            match registry.mode(self.mode()) {
                Some(mode) => mode,
                None => {
                    tracing::error!(url, mode = self.mode(), "pinned mode is not registered");
                    return;
                }
            }
        };

        if !mode.requires().satisfied_by(registry.env().capabilities()) {
            tracing::warn!(url, mode = mode.name(), "mode is not supported in this context");
            return;
        }

        tracing::debug!(url, mode = mode.name(), "dispatching");
        match mode.load(self, &[Value::from(url)]) {
            Ok(LoadOutcome::Rejected(err)) => {
                tracing::warn!(url, mode = mode.name(), error = %err, "load failed");
            }
            Ok(_) => {}
            Err(err) => tracing::error!(url, mode = mode.name(), error = %err, "load aborted"),
        }
    }
}
