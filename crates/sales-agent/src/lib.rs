//! A terminal car sales assistant.
//!
//! The binary wires an OpenAI-compatible model into a
//! [`Session`](sales_agent_core::Session) and runs the interactive loop.
//! The pieces are exposed here so other hosts can reuse them.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod repl;

pub use config::{Cli, ConfigError, Settings};
pub use repl::Repl;

/// Re-exports of [`sales_agent_core`] crate.
pub mod core {
    pub use sales_agent_core::*;
}
