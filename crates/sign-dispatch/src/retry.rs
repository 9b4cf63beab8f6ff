use crate::error::{Result, TransportError};
use crate::traits::Transport;
use crate::types::DispatchMessage;
use rand::Rng;
use std::time::Duration;

/// Bounded retry with jittered exponential backoff. The broker boundary
/// is the only place in the system where a retry has a meaningful
/// corrective effect, so it is the only place one exists.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), jittered to half
    /// to full of the exponential step.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
            .min(self.max_delay);
        exp.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
    }
}

/// Publish one routed message to every channel it targets, retrying each
/// failed publish per the policy. Returns the last error once a channel
/// exhausts its attempts; the caller logs it and keeps its loop running.
pub fn publish_message(
    transport: &mut dyn Transport,
    message: &DispatchMessage,
    policy: &RetryPolicy,
) -> Result<()> {
    let payload = message.command().to_wire()?;
    for channel in &message.targets {
        let mut last_err: Option<TransportError> = None;
        let mut published = false;
        for attempt in 1..=policy.max_attempts.max(1) {
            match transport.publish(*channel, &payload) {
                Ok(()) => {
                    published = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        channel = channel.topic(),
                        token = %message.token,
                        attempt,
                        error = %e,
                        "publish failed"
                    );
                    last_err = Some(e);
                    if attempt < policy.max_attempts {
                        std::thread::sleep(policy.delay_for(attempt));
                    }
                }
            }
        }
        if !published {
            return Err(last_err.unwrap_or(TransportError::Timeout));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::types::{Channel, DispatchMode};

    fn msg() -> DispatchMessage {
        DispatchMessage {
            mode: DispatchMode::WholeSign,
            token: "hola".to_owned(),
            targets: vec![Channel::LeftHand, Channel::RightHand],
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn publishes_to_every_target() {
        let mut transport = MockTransport::default();
        publish_message(&mut transport, &msg(), &fast_policy(3)).unwrap();
        let published = transport.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].0, Channel::LeftHand);
        assert_eq!(published[1].0, Channel::RightHand);
    }

    #[test]
    fn retries_through_transient_failures() {
        let mut transport = MockTransport::failing_first(2);
        publish_message(&mut transport, &msg(), &fast_policy(3)).unwrap();
        // Two failures burned on the first channel, then both succeed.
        assert_eq!(transport.published().len(), 2);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut transport = MockTransport::failing_first(u32::MAX);
        let err = publish_message(&mut transport, &msg(), &fast_policy(2)).unwrap_err();
        assert!(matches!(err, TransportError::Publish(_)));
    }

    #[test]
    fn backoff_is_bounded_by_max_delay() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
        };
        for attempt in 1..10 {
            assert!(policy.delay_for(attempt) <= Duration::from_millis(300));
        }
    }
}
