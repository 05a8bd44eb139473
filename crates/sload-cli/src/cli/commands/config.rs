//! `sload config` – show where config and logs live and the effective configuration.

use anyhow::Result;
use sload_core::config::{self, SloadConfig};
use sload_core::logging;

pub fn run_config(cfg: &SloadConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    match logging::log_path() {
        Ok(path) => println!("log file:    {}", path.display()),
        Err(err) => println!("log file:    unavailable ({err:#})"),
    }
    println!("{}", serde_json::to_string_pretty(cfg)?);
    Ok(())
}
