//! HTML fragment mode. Handles URLs ending in `.html`.
//!
//! The fragment is fetched as text. With a DOM it either replaces the content
//! of `target` or is parsed into a detached document; without one the raw
//! text is the result.

use crate::env::{Capabilities, Requirement};
use crate::error::LoaderError;
use crate::fetch::FetchInit;
use crate::registry::{validators, Claim, ModeTables};
use crate::resource::Resource;
use crate::settings::Settings;
use crate::value::Value;

use super::{compose_url, LoadOptions, LoadOutcome, Mode};

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMode;

impl Mode for HtmlMode {
    fn name(&self) -> &str {
        "html"
    }

    fn handles(&self, url: &str, _doc: &Settings) -> bool {
        url.ends_with(".html")
    }

    fn requires(&self) -> Requirement {
        Requirement::All(Capabilities::FETCH)
    }

    fn contributions(&self) -> ModeTables {
        ModeTables::new()
            .option("htmlPrefix", "", validators::is_str(), validators::MUST_STR)
            .option("htmlSuffix", "", validators::is_str(), validators::MUST_STR)
            .option("htmlExtend", false, validators::is_bool(), validators::MUST_BOOL)
            .option("htmlMode", Value::Null, validators::opt_number(), validators::MUST_OPT_NUM)
            .option("fetch", Value::Null, validators::opt_map(), validators::MUST_OPT_OBJ)
            .auto_props(&["mode", "func", "target"])
    }

    fn load(&self, doc: &Settings, args: &[Value]) -> Result<LoadOutcome, LoaderError> {
        let registry = doc.registry();
        let Some(fetch) = registry.env().fetch() else {
            tracing::warn!("load.html() needs a fetch capability");
            return Ok(LoadOutcome::Unsupported);
        };

        let opts = LoadOptions::gather(doc, args, Some("fetch"), None)?;
        let url = compose_url(
            opts.url(),
            opts.str_or_empty("htmlPrefix"),
            opts.str_or_empty("htmlSuffix"),
        );

        let guard = match registry.cache().claim(self.name(), &url) {
            Claim::Fresh(guard) => guard,
            Claim::Done(Some(cached)) => return Ok(LoadOutcome::Resolved(cached)),
            Claim::Done(None) => return Ok(LoadOutcome::Chained),
        };

        let init = FetchInit::from_value(opts.get("fetch").unwrap_or(&Value::Null));
        tracing::debug!(%url, method = init.method(), "html.load");

        let outcome = fetch.fetch(&url, &init).map(|resp| {
            let text = resp.text();
            match (registry.env().dom(), opts.target()) {
                (Some(dom), Some(target)) => {
                    dom.set_inner_html(target, &text);
                    Resource::Element(target)
                }
                (Some(dom), None) => {
                    let mode = opts.get("htmlMode").and_then(Value::as_number).unwrap_or(0.0);
                    Resource::Document(dom.parse_html(&text, opts.flag("htmlExtend"), mode as i64))
                }
                (None, _) => Resource::Text(text),
            }
        });

        match &outcome {
            Ok(resource) => guard.complete(Some(resource.clone())),
            Err(err) => {
                tracing::warn!(%url, error = %err, "html fetch failed");
                drop(guard);
            }
        }
        Ok(opts.settle(&url, outcome))
    }
}
