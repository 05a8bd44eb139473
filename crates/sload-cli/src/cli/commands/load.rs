//! `sload load` – run load arguments through the default loader.

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use sload_core::config::SloadConfig;
use sload_core::{Callback, Completion, Options, Resource, Value};

use super::build_loader;

#[derive(Debug, Clone, Default)]
pub struct LoadArgs {
    pub args: Vec<String>,
    pub mode: Option<String>,
    pub headers: Vec<String>,
    pub no_validate: bool,
}

/// One printed line per completion.
#[derive(Debug, Clone, PartialEq)]
struct Report {
    url: String,
    ok: bool,
    status: Option<u32>,
    bytes: Option<usize>,
}

impl Report {
    fn from_completion(c: &Completion) -> Self {
        match &c.outcome {
            Ok(resource) => {
                let (status, bytes) = match resource {
                    Resource::Response(r) => (Some(r.status), Some(r.body.len())),
                    Resource::Text(t) => (None, Some(t.len())),
                    _ => (None, None),
                };
                Self {
                    url: c.url.clone(),
                    ok: true,
                    status,
                    bytes,
                }
            }
            Err(err) => Self {
                url: c.url.clone(),
                ok: false,
                status: err.status(),
                bytes: None,
            },
        }
    }
}

pub fn run_load(cfg: &SloadConfig, opts: &LoadArgs) -> Result<()> {
    let loader = build_loader(cfg)?;

    let mut preamble = Options::new();
    if opts.no_validate {
        preamble.insert("validate".to_string(), Value::from(false));
    }
    if let Some(mode) = &opts.mode {
        if !loader.registry().has_mode(mode) {
            bail!(
                "unknown mode '{}' (available: {})",
                mode,
                loader.registry().mode_names().join(", ")
            );
        }
        preamble.insert("mode".to_string(), Value::from(mode));
    }
    if !opts.headers.is_empty() {
        let headers = parse_headers(&opts.headers)?;
        preamble.insert(
            "fetch".to_string(),
            Value::map([("headers", Value::Map(headers))]),
        );
    }

    let reports: Arc<Mutex<Vec<Report>>> = Arc::default();
    let sink = Arc::clone(&reports);
    let callback = Callback::new(move |c: &Completion| {
        if let Ok(mut reports) = sink.lock() {
            reports.push(Report::from_completion(c));
        }
    });

    let mut args = vec![Value::Map(preamble), Value::from(callback)];
    args.extend(opts.args.iter().map(|a| parse_arg(a)));
    tracing::debug!(count = args.len(), "running load");
    loader.load(&args);

    let reports = reports
        .lock()
        .map_err(|_| anyhow::anyhow!("completion log poisoned"))?
        .clone();
    if reports.is_empty() {
        println!("Nothing was loaded (see the log for skipped arguments).");
        return Ok(());
    }

    println!("{:<6} {:<6} {:<10} {}", "RESULT", "STATUS", "BYTES", "URL");
    for r in &reports {
        println!(
            "{:<6} {:<6} {:<10} {}",
            if r.ok { "ok" } else { "failed" },
            r.status.map_or_else(|| "-".to_string(), |s| s.to_string()),
            r.bytes.map_or_else(|| "-".to_string(), |b| b.to_string()),
            r.url
        );
    }

    let failed = reports.iter().filter(|r| !r.ok).count();
    if failed > 0 {
        bail!("{} of {} loads failed", failed, reports.len());
    }
    Ok(())
}

/// `key=value` becomes a one-entry option map; anything else is a URL.
fn parse_arg(arg: &str) -> Value {
    match arg.split_once('=') {
        Some((key, raw))
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            let value = serde_json::from_str::<serde_json::Value>(raw)
                .map(Value::from)
                .unwrap_or_else(|_| Value::from(raw));
            Value::map([(key, value)])
        }
        _ => Value::from(arg),
    }
}

fn parse_headers(raw: &[String]) -> Result<Options> {
    let mut out = Options::new();
    for h in raw {
        let Some((name, value)) = h.split_once(':') else {
            bail!("header must be 'Name: value', got '{}'", h);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("header name is empty in '{}'", h);
        }
        out.insert(name.to_string(), Value::from(value.trim()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_args_are_urls() {
        assert_eq!(parse_arg("a.js"), Value::from("a.js"));
        assert_eq!(parse_arg("data.json?x=1"), Value::from("data.json?x=1"));
        assert_eq!(
            parse_arg("https://cdn.example.com/a.css?v=2"),
            Value::from("https://cdn.example.com/a.css?v=2")
        );
    }

    #[test]
    fn key_value_args_become_options() {
        assert_eq!(
            parse_arg("dataPrefix=https://cdn/"),
            Value::map([("dataPrefix", "https://cdn/")])
        );
        assert_eq!(parse_arg("useOnLoad=false"), Value::map([("useOnLoad", false)]));
        assert_eq!(parse_arg("htmlMode=2"), Value::map([("htmlMode", 2)]));
    }

    #[test]
    fn headers_are_split_and_trimmed() {
        let h = parse_headers(&["Accept:  text/html ".to_string()]).unwrap();
        assert_eq!(h.get("Accept"), Some(&Value::from("text/html")));
        assert!(parse_headers(&["no colon".to_string()]).is_err());
        assert!(parse_headers(&[": v".to_string()]).is_err());
    }

    #[test]
    fn report_from_failed_completion() {
        let c = Completion::failed("x.json", sload_core::TransportError::Http(503));
        let r = Report::from_completion(&c);
        assert!(!r.ok);
        assert_eq!(r.status, Some(503));
        assert_eq!(r.bytes, None);
    }
}
