//! Sales performance analytics core.
//!
//! Reduces raw CRM records into per-rep metric groups, derives bounded
//! skill scores and a tier classification, and rolls whole teams up into
//! cached coaching insights.
//!
//! Layering follows ports-and-adapters: `domain` holds the types, pure
//! computations, and collaborator traits; `application` the orchestrating
//! services; `infrastructure` the in-memory adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
