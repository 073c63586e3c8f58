//! An abstraction layer for hosted chat-completion models.
//!
//! This crate establishes a small protocol between the sales agent and
//! the model provider it talks to, so that the agent can switch between
//! providers (or a scripted fake in tests) without touching the session
//! logic.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod completion;
mod error;
mod provider;
mod request;

pub use completion::*;
pub use error::*;
pub use provider::*;
pub use request::*;
