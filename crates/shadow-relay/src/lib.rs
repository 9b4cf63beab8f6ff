//! shadow-relay: the cloud-held one-slot mailbox and the doorbell
//!
//! When the arm side has something to say, the last dispatched word is
//! stored in the device shadow (a field-addressable cloud document) and
//! a proactive notification nudges the voice assistant. The voice side
//! reads the slot on launch and clears it, so each word is spoken once.

mod error;
mod mailbox;
mod relay;

pub use error::{RelayError, Result};
pub use mailbox::{Mailbox, MemoryMailbox};
pub use relay::{relay_word, LogNotifier, Notifier};

#[cfg(feature = "http")]
mod notify;
#[cfg(feature = "http")]
mod shadow;
#[cfg(feature = "http")]
pub use notify::ProactiveNotifier;
#[cfg(feature = "http")]
pub use shadow::ShadowMailbox;
