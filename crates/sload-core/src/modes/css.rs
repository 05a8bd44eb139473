//! Stylesheet mode. Handles URLs ending in `.css`; needs a DOM.

use crate::env::{Capabilities, Requirement};
use crate::error::LoaderError;
use crate::registry::{validators, Claim, ModeTables};
use crate::settings::Settings;
use crate::value::{Options, Value};

use super::element::{inject, ElementSpec};
use super::{compose_url, LoadOptions, LoadOutcome, Mode};

const LINK: ElementSpec<'static> = ElementSpec {
    tag: "link",
    props_key: "linkProps",
    attrs_key: "linkAttrs",
    fixed: &[("rel", "stylesheet"), ("type", "text/css")],
    url_prop: "href",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct StyleMode;

impl Mode for StyleMode {
    fn name(&self) -> &str {
        "css"
    }

    fn handles(&self, url: &str, _doc: &Settings) -> bool {
        url.ends_with(".css")
    }

    fn requires(&self) -> Requirement {
        Requirement::All(Capabilities::DOM)
    }

    fn contributions(&self) -> ModeTables {
        ModeTables::new()
            .option("cssPrefix", "", validators::is_str(), validators::MUST_STR)
            .option("cssSuffix", "", validators::is_str(), validators::MUST_STR)
            .option("linkProps", Options::new(), validators::is_map(), validators::MUST_OBJ)
            .option("linkAttrs", Options::new(), validators::is_map(), validators::MUST_OBJ)
    }

    fn load(&self, doc: &Settings, args: &[Value]) -> Result<LoadOutcome, LoaderError> {
        let registry = doc.registry();
        let Some(dom) = registry.env().dom() else {
            tracing::warn!("load.css() is not supported in this context");
            return Ok(LoadOutcome::Unsupported);
        };

        let opts = LoadOptions::gather(doc, args, Some("linkProps"), Some("linkAttrs"))?;
        let url = compose_url(
            opts.url(),
            opts.str_or_empty("cssPrefix"),
            opts.str_or_empty("cssSuffix"),
        );

        match registry.cache().claim(self.name(), &url) {
            Claim::Fresh(guard) => {
                guard.complete(None);
                inject(dom.as_ref(), &opts, &LINK, &url);
            }
            Claim::Done(_) => tracing::debug!(%url, "stylesheet already loaded"),
        }
        Ok(LoadOutcome::Chained)
    }
}
