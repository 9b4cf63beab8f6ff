//! sign-dispatch: routing decisions and the broker boundary
//!
//! The router decides, per word, whether the arm gets a whole-sign
//! command or a spell-out command, and on which logical channels. The
//! transport trait hides the broker client; publish failures are the one
//! place this system retries, with bounded jittered backoff, and a final
//! failure is logged rather than allowed to take down the capture loop.

mod error;
mod retry;
mod router;
mod traits;
mod types;

pub use error::{Result, TransportError};
pub use retry::{publish_message, RetryPolicy};
pub use router::route;
pub use traits::Transport;
pub use types::{Channel, DispatchMessage, DispatchMode, SignCommand};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::MockTransport;

#[cfg(feature = "mqtt")]
mod mqtt;
#[cfg(feature = "mqtt")]
pub use mqtt::{subscribe_loop, MqttConfig, MqttTransport};
