//! sload core: settings documents, a mode registry and the dispatcher that
//! routes load calls to resource-loading modes.
//!
//! The host supplies its primitives (document, fetch, module loader) through
//! an [`Environment`]; the crate ships [`fetch::CurlFetch`] for the network.

pub mod config;
pub mod env;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod logging;
pub mod modes;
pub mod registry;
pub mod resource;
pub mod settings;
pub mod value;

pub use config::RegistryConfig;
pub use env::Environment;
pub use error::{LoaderError, TransportError};
pub use loader::Loader;
pub use modes::{LoadOutcome, Mode, AUTO};
pub use registry::Registry;
pub use resource::{Completion, Resource};
pub use settings::Settings;
pub use value::{Callback, Options, Value};
