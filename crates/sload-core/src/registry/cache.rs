//! Per-mode record of requested URLs and cached results.
//!
//! A URL is claimed before any I/O starts, so two loads of the same URL racing
//! on different threads perform the external effect once: the second claim
//! blocks until the first settles, then sees the cached result. A failed
//! owner releases its claim and the next waiter retries. A claim made again
//! by the owning thread (a load that re-enters itself) does not wait; it is
//! answered from whatever is cached so far.

use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::resource::Resource;

#[derive(Debug, Default)]
struct CacheState {
    /// Mode name -> URLs in the order they completed. Append-only.
    loaded: HashMap<String, Vec<String>>,
    /// Mode name -> URL -> last successful result.
    metadata: HashMap<String, HashMap<String, Resource>>,
    /// (mode, url) -> thread that owns the load.
    in_flight: HashMap<(String, String), ThreadId>,
}

impl CacheState {
    fn is_loaded(&self, mode: &str, url: &str) -> bool {
        self.loaded
            .get(mode)
            .map_or(false, |urls| urls.iter().any(|u| u == url))
    }

    fn cached(&self, mode: &str, url: &str) -> Option<Resource> {
        self.metadata.get(mode).and_then(|m| m.get(url)).cloned()
    }
}

/// Shared `loaded`/`metadata` tables for every mode of one registry.
#[derive(Debug, Default)]
pub struct LoadCache {
    state: Mutex<CacheState>,
    settled: Condvar,
}

/// Result of claiming a URL for loading.
#[must_use]
pub enum Claim<'a> {
    /// The caller owns the load and must settle it through the guard.
    Fresh(ClaimGuard<'a>),
    /// Already loaded, or re-entered by its owner; carries the cached result
    /// for cacheable modes.
    Done(Option<Resource>),
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create the empty tables for a newly registered mode. Existing history is kept.
    pub fn init_mode(&self, mode: &str) {
        let mut state = self.lock();
        state.loaded.entry(mode.to_string()).or_default();
        state.metadata.entry(mode.to_string()).or_default();
    }

    /// Claim `url` for `mode`, waiting while another thread's load of it is in flight.
    pub fn claim(&self, mode: &str, url: &str) -> Claim<'_> {
        let mut state = self.lock();
        let key = (mode.to_string(), url.to_string());
        loop {
            if state.is_loaded(mode, url) {
                return Claim::Done(state.cached(mode, url));
            }
            let me = thread::current().id();
            match state.in_flight.get(&key).copied() {
                None => {
                    state.in_flight.insert(key.clone(), me);
                    return Claim::Fresh(ClaimGuard {
                        cache: self,
                        mode: key.0,
                        url: key.1,
                        settled: false,
                    });
                }
                Some(owner) if owner == me => {
                    tracing::debug!(mode, url, "re-entrant load of an in-flight url");
                    return Claim::Done(state.cached(mode, url));
                }
                Some(_) => {}
            }
            tracing::debug!(mode, url, "waiting for in-flight load");
            state = self
                .settled
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// URLs recorded for `mode`, in completion order.
    pub fn loaded(&self, mode: &str) -> Vec<String> {
        self.lock().loaded.get(mode).cloned().unwrap_or_default()
    }

    pub fn is_loaded(&self, mode: &str, url: &str) -> bool {
        self.lock().is_loaded(mode, url)
    }

    pub fn is_in_flight(&self, mode: &str, url: &str) -> bool {
        self.lock()
            .in_flight
            .contains_key(&(mode.to_string(), url.to_string()))
    }

    /// Last successful result stored for `url` under `mode`.
    pub fn cached(&self, mode: &str, url: &str) -> Option<Resource> {
        self.lock().cached(mode, url)
    }
}

/// Ownership of an in-flight load. Dropping it without [`complete`](Self::complete)
/// releases the claim so a later call can retry.
pub struct ClaimGuard<'a> {
    cache: &'a LoadCache,
    mode: String,
    url: String,
    settled: bool,
}

impl ClaimGuard<'_> {
    /// Record the URL as loaded, caching `resource` when given.
    pub fn complete(mut self, resource: Option<Resource>) {
        {
            let mut state = self.cache.lock();
            let key = (self.mode.clone(), self.url.clone());
            state.in_flight.remove(&key);
            state
                .loaded
                .entry(self.mode.clone())
                .or_default()
                .push(self.url.clone());
            if let Some(resource) = resource {
                state
                    .metadata
                    .entry(self.mode.clone())
                    .or_default()
                    .insert(self.url.clone(), resource);
            }
        }
        self.settled = true;
        self.cache.settled.notify_all();
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.cache
            .lock()
            .in_flight
            .remove(&(self.mode.clone(), self.url.clone()));
        self.cache.settled.notify_all();
    }
}
