use crate::error::{Result, TransportError};
use crate::traits::Transport;
use crate::types::Channel;

/// In-memory transport: records everything published and can be told to
/// fail its first N calls for retry tests.
#[derive(Debug, Default)]
pub struct MockTransport {
    published: Vec<(Channel, Vec<u8>)>,
    failures_left: u32,
}

impl MockTransport {
    /// Fail the first `n` publish calls with a transient error.
    pub fn failing_first(n: u32) -> Self {
        Self {
            published: Vec::new(),
            failures_left: n,
        }
    }

    pub fn published(&self) -> &[(Channel, Vec<u8>)] {
        &self.published
    }
}

impl Transport for MockTransport {
    fn publish(&mut self, channel: Channel, payload: &[u8]) -> Result<()> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(TransportError::Publish("injected failure".to_owned()));
        }
        self.published.push((channel, payload.to_vec()));
        Ok(())
    }
}
