//! `sload modes` – list registered modes.

use anyhow::Result;
use sload_core::config::SloadConfig;
use sload_core::env::Requirement;

use super::build_loader;

fn describe(req: Requirement) -> String {
    match req {
        Requirement::None => "-".to_string(),
        Requirement::All(caps) => format!("all of {:?}", caps),
        Requirement::Any(caps) => format!("any of {:?}", caps),
    }
}

pub fn run_modes(cfg: &SloadConfig) -> Result<()> {
    let loader = build_loader(cfg)?;
    let caps = loader.registry().env().capabilities();
    println!("{:<6} {:<10} {:<40} {}", "MODE", "AVAILABLE", "REQUIRES", "OPTIONS");
    for mode in loader.registry().modes() {
        let options: Vec<String> = mode
            .contributions()
            .defaults
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.to_json()))
            .collect();
        println!(
            "{:<6} {:<10} {:<40} {}",
            mode.name(),
            if mode.requires().satisfied_by(caps) { "yes" } else { "no" },
            describe(mode.requires()),
            options.join(" ")
        );
    }
    Ok(())
}
