//! Core library for the Lookout catalogue and status tool.
//!
//! The crate provides two small building blocks and the plumbing that wires
//! them to a provider: a resolver that maps abbreviated, human-entered names
//! (`4gb`, `ubuntu`) onto catalogue entries, and a poller that watches a
//! remote resource until it reaches a target state, fails, or runs out of
//! time.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod normalize;
pub mod orchestrator;
pub mod poll;
pub mod resolve;
pub mod scaleway;
pub mod test_support;

pub use backend::{Backend, ImageSummary, ServerHandle, ServerSnapshot};
pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use config::{ConfigError, PollConfig, ScalewayConfig};
pub use orchestrator::{Orchestrator, WaitError};
pub use poll::{Clock, PollOutcome, PollSettings, PollSettingsError, PollState, Poller, TokioClock};
pub use resolve::{Candidate, MatchMode, Resolution, resolve, resolve_exact, try_resolve};
pub use scaleway::{ScalewayBackend, ScalewayBackendError};
