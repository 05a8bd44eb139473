//! CLI command handlers, one per file.

mod config;
mod load;
mod modes;

use std::sync::Arc;

use anyhow::Result;
use sload_core::config::SloadConfig;
use sload_core::fetch::CurlFetch;
use sload_core::{Environment, Loader, Value};

pub use config::run_config;
pub use load::{run_load, LoadArgs};
pub use modes::run_modes;

/// Standard loader over a curl fetch, with the config's option overrides applied.
fn build_loader(cfg: &SloadConfig) -> Result<Loader> {
    let env = Environment::new().with_fetch(Arc::new(CurlFetch::new(cfg.fetch.clone())));
    let loader = Loader::standard(env, cfg.registry)?;
    let overrides = cfg.option_overrides();
    if !overrides.is_empty() {
        loader.set(&Value::Map(overrides), None)?;
    }
    Ok(loader)
}
