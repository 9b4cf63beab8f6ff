//! intent-session: voice intent handling and per-user translator mode
//!
//! The voice-assistant runtime hands us one request at a time; we keep a
//! per-user `translator mode` flag, answer with prompt text, and turn
//! translate requests into dispatch messages. Any fault inside a request
//! becomes a single generic error response that ends the session, never
//! a partial answer.

mod error;
mod handler;
mod session;
mod types;

pub use error::{IntentError, Result};
pub use handler::IntentHandler;
pub use session::{SessionStore, DEFAULT_SESSION_TTL};
pub use types::{IntentRequest, IntentResponse};
