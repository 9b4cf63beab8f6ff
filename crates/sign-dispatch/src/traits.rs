use crate::error::Result;
use crate::types::Channel;

/// Broker boundary. Implementations carry at-least-once delivery and a
/// bounded internal timeout; callers treat a returned error as final for
/// this attempt and decide whether to retry.
pub trait Transport: Send {
    fn publish(&mut self, channel: Channel, payload: &[u8]) -> Result<()>;
}
