//! Script mode. Handles URLs ending in `.js`.
//!
//! With a DOM, a `<script>` element is inserted. Without one, a worker-style
//! script importer is used, and failing that the host module loader, whose
//! module handle is cached.

use crate::env::{Capabilities, Requirement};
use crate::error::LoaderError;
use crate::registry::{validators, Claim, ModeTables};
use crate::resource::Resource;
use crate::settings::Settings;
use crate::value::{Options, Value};

use super::element::{inject, ElementSpec};
use super::{compose_url, LoadOptions, LoadOutcome, Mode};

const SCRIPT: ElementSpec<'static> = ElementSpec {
    tag: "script",
    props_key: "scriptProps",
    attrs_key: "scriptAttrs",
    fixed: &[],
    url_prop: "src",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptMode;

impl Mode for ScriptMode {
    fn name(&self) -> &str {
        "js"
    }

    fn handles(&self, url: &str, _doc: &Settings) -> bool {
        url.ends_with(".js")
    }

    fn requires(&self) -> Requirement {
        Requirement::Any(Capabilities::DOM | Capabilities::SCRIPT_IMPORT | Capabilities::MODULES)
    }

    fn contributions(&self) -> ModeTables {
        ModeTables::new()
            .option("jsPrefix", "", validators::is_str(), validators::MUST_STR)
            .option("jsSuffix", "", validators::is_str(), validators::MUST_STR)
            .option("scriptProps", Options::new(), validators::is_map(), validators::MUST_OBJ)
            .option("scriptAttrs", Options::new(), validators::is_map(), validators::MUST_OBJ)
    }

    fn load(&self, doc: &Settings, args: &[Value]) -> Result<LoadOutcome, LoaderError> {
        let opts = LoadOptions::gather(doc, args, Some("scriptProps"), Some("scriptAttrs"))?;
        let url = compose_url(
            opts.url(),
            opts.str_or_empty("jsPrefix"),
            opts.str_or_empty("jsSuffix"),
        );
        tracing::debug!(%url, "js.load");

        let registry = doc.registry();
        let guard = match registry.cache().claim(self.name(), &url) {
            Claim::Fresh(guard) => guard,
            Claim::Done(Some(cached)) => return Ok(LoadOutcome::Resolved(cached)),
            Claim::Done(None) => return Ok(LoadOutcome::Chained),
        };

        let env = registry.env();
        if let Some(dom) = env.dom() {
            guard.complete(None);
            inject(dom.as_ref(), &opts, &SCRIPT, &url);
            return Ok(LoadOutcome::Chained);
        }

        if let Some(scripts) = env.scripts() {
            let outcome = scripts.import_scripts(&url).map(|()| Resource::Imported);
            match &outcome {
                Ok(_) => guard.complete(None),
                Err(_) => drop(guard),
            }
            return Ok(match opts.settle(&url, outcome) {
                LoadOutcome::Resolved(_) => LoadOutcome::Chained,
                other => other,
            });
        }

        if let Some(modules) = env.modules() {
            let outcome = modules.resolve(&url).map(Resource::Module);
            match &outcome {
                Ok(resource) => guard.complete(Some(resource.clone())),
                Err(_) => drop(guard),
            }
            return Ok(opts.settle(&url, outcome));
        }

        tracing::warn!(%url, "load.js() is not supported in this context");
        Ok(LoadOutcome::Unsupported)
    }
}
