//! Data mode: the fallback.
//!
//! Handles every URL, but as a fallback it only receives those no other mode
//! claims. Issues a fetch with the `fetch` option as init and caches the
//! response.

use crate::env::{Capabilities, Requirement};
use crate::error::LoaderError;
use crate::fetch::FetchInit;
use crate::registry::{validators, Claim, ModeTables};
use crate::resource::Resource;
use crate::settings::Settings;
use crate::value::Value;

use super::{compose_url, LoadOptions, LoadOutcome, Mode};

#[derive(Debug, Clone, Copy, Default)]
pub struct DataMode;

impl Mode for DataMode {
    fn name(&self) -> &str {
        "data"
    }

    fn handles(&self, _url: &str, _doc: &Settings) -> bool {
        true
    }

    fn is_fallback(&self) -> bool {
        true
    }

    fn requires(&self) -> Requirement {
        Requirement::All(Capabilities::FETCH)
    }

    fn contributions(&self) -> ModeTables {
        ModeTables::new()
            .option("dataPrefix", "", validators::is_str(), validators::MUST_STR)
            .option("dataSuffix", "", validators::is_str(), validators::MUST_STR)
            .option("fetch", Value::Null, validators::opt_map(), validators::MUST_OPT_OBJ)
            .auto_props(&["mode", "func"])
    }

    fn load(&self, doc: &Settings, args: &[Value]) -> Result<LoadOutcome, LoaderError> {
        let registry = doc.registry();
        let Some(fetch) = registry.env().fetch() else {
            tracing::warn!("load.data() needs a fetch capability");
            return Ok(LoadOutcome::Unsupported);
        };

        let opts = LoadOptions::gather(doc, args, Some("fetch"), None)?;
        let url = compose_url(
            opts.url(),
            opts.str_or_empty("dataPrefix"),
            opts.str_or_empty("dataSuffix"),
        );

        let guard = match registry.cache().claim(self.name(), &url) {
            Claim::Fresh(guard) => guard,
            Claim::Done(Some(cached)) => return Ok(LoadOutcome::Resolved(cached)),
            Claim::Done(None) => return Ok(LoadOutcome::Chained),
        };

        let init = FetchInit::from_value(opts.get("fetch").unwrap_or(&Value::Null));
        tracing::debug!(%url, method = init.method(), "data.load");
        let outcome = fetch.fetch(&url, &init).map(Resource::Response);
        match &outcome {
            Ok(resource) => guard.complete(Some(resource.clone())),
            Err(err) => {
                tracing::warn!(%url, error = %err, "data fetch failed");
                drop(guard);
            }
        }
        Ok(opts.settle(&url, outcome))
    }
}
