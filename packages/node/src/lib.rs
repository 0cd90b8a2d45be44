//! Public surface for the `ldr-server` crate.
//!
//! Exposes the router builder, config, and startup helpers so that external
//! crates (e.g. the conformance test suite) can spin up an in-process server
//! without spawning a subprocess.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod startup;

pub use config::ServerConfig;
pub use router::build_router;
