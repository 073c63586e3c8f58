//! Core logic of the sales agent: inventory grounding, the persona prompt,
//! the conversation session, intent detection and appointment storage.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod appointment;
pub mod conversation;
mod error;
pub mod intent;
pub mod inventory;
mod model_client;
pub mod persona;
pub mod session;

pub use error::{Error, ErrorKind};
pub use model_client::{DEFAULT_REQUEST_TIMEOUT, ModelClientError};
pub use session::{Session, SessionBuilder, fallback_message};
