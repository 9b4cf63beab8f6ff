//! phrase-builder: debounced accumulation of classifier output
//!
//! The capture loop classifies every frame, but a held gesture must not
//! spray repeated characters into the phrase. This state machine keeps
//! at most one pending observation, gates commits on a confidence
//! threshold and a debounce interval, and owns the phrase buffer until
//! it is flushed downstream.

use gesture_classify::Classification;
use std::time::{Duration, Instant};

/// Observations below this confidence are discarded on arrival.
pub const CONFIDENCE_THRESHOLD: f32 = 0.85;

/// Minimum time between two accepted commits.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(500);

/// Outcome of a commit attempt. Neither rejection is an error; the
/// caller just moves on to the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The pending label was appended to the buffer.
    Appended(String),
    /// No pending high-confidence observation to commit.
    NotReady,
    /// The debounce interval since the last commit has not elapsed.
    Debounced,
}

/// Debounced phrase accumulator.
///
/// States: *Idle* (`pending == None`) and *Ready* (`pending == Some`).
/// The pending slot is refreshed by `observe` every loop iteration, so
/// a commit always acts on the most recent frame, never a stale one.
#[derive(Debug)]
pub struct PhraseBuilder {
    confidence_threshold: f32,
    debounce: Duration,
    pending: Option<Classification>,
    buffer: String,
    last_commit: Option<Instant>,
}

impl Default for PhraseBuilder {
    fn default() -> Self {
        Self::new(CONFIDENCE_THRESHOLD, DEBOUNCE_INTERVAL)
    }
}

impl PhraseBuilder {
    pub fn new(confidence_threshold: f32, debounce: Duration) -> Self {
        Self {
            confidence_threshold,
            debounce,
            pending: None,
            buffer: String::new(),
            last_commit: None,
        }
    }

    /// Record this frame's classification. Below-threshold results clear
    /// the pending slot rather than leaving an old observation armed.
    pub fn observe(&mut self, result: Classification) {
        if result.confidence >= self.confidence_threshold {
            self.pending = Some(result);
        } else {
            self.pending = None;
        }
    }

    /// Commit the pending label, using the caller's clock. Tests drive
    /// this directly; production code uses [`Self::commit`].
    pub fn commit_at(&mut self, now: Instant) -> CommitOutcome {
        let Some(pending) = self.pending.as_ref() else {
            return CommitOutcome::NotReady;
        };
        if let Some(last) = self.last_commit {
            if now.duration_since(last) < self.debounce {
                tracing::debug!(label = %pending.label, "commit inside debounce window, ignoring");
                return CommitOutcome::Debounced;
            }
        }
        let label = pending.label.clone();
        self.buffer.push_str(&label);
        self.last_commit = Some(now);
        tracing::debug!(%label, phrase = %self.buffer, "label committed");
        CommitOutcome::Appended(label)
    }

    pub fn commit(&mut self) -> CommitOutcome {
        self.commit_at(Instant::now())
    }

    /// Drop the last committed character. No-op on an empty buffer.
    pub fn undo(&mut self) -> bool {
        match self.buffer.pop() {
            Some(_) => {
                tracing::debug!(phrase = %self.buffer, "last character removed");
                true
            }
            None => false,
        }
    }

    /// Hand the full buffer to the caller and clear it, or `None` when
    /// there is nothing to send.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.buffer))
    }

    /// Current buffer contents, for on-screen feedback.
    pub fn phrase(&self) -> &str {
        &self.buffer
    }

    /// The armed observation, if the last frame met the threshold.
    pub fn pending(&self) -> Option<&Classification> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(label: &str, confidence: f32) -> Classification {
        Classification {
            label: label.to_owned(),
            confidence,
        }
    }

    #[test]
    fn low_confidence_observations_are_discarded() {
        let mut builder = PhraseBuilder::default();
        builder.observe(seen("a", 0.5));
        assert!(builder.pending().is_none());
        assert_eq!(builder.commit_at(Instant::now()), CommitOutcome::NotReady);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut builder = PhraseBuilder::default();
        builder.observe(seen("a", CONFIDENCE_THRESHOLD));
        assert!(builder.pending().is_some());
    }

    #[test]
    fn low_confidence_frame_disarms_a_previous_observation() {
        let mut builder = PhraseBuilder::default();
        builder.observe(seen("a", 0.95));
        builder.observe(seen("b", 0.2));
        assert_eq!(builder.commit_at(Instant::now()), CommitOutcome::NotReady);
    }

    #[test]
    fn commits_append_in_order() {
        let mut builder = PhraseBuilder::default();
        let t0 = Instant::now();
        builder.observe(seen("h", 0.9));
        assert_eq!(
            builder.commit_at(t0),
            CommitOutcome::Appended("h".to_owned())
        );
        builder.observe(seen("i", 0.9));
        assert_eq!(
            builder.commit_at(t0 + DEBOUNCE_INTERVAL),
            CommitOutcome::Appended("i".to_owned())
        );
        assert_eq!(builder.phrase(), "hi");
    }

    #[test]
    fn at_most_one_append_per_debounce_window() {
        let mut builder = PhraseBuilder::default();
        let t0 = Instant::now();
        builder.observe(seen("x", 0.9));

        assert_eq!(
            builder.commit_at(t0),
            CommitOutcome::Appended("x".to_owned())
        );
        // Hammer commits every 100ms for a full window; none may land.
        for i in 1..5 {
            builder.observe(seen("x", 0.9));
            assert_eq!(
                builder.commit_at(t0 + Duration::from_millis(100 * i)),
                CommitOutcome::Debounced
            );
        }
        builder.observe(seen("x", 0.9));
        assert_eq!(
            builder.commit_at(t0 + DEBOUNCE_INTERVAL),
            CommitOutcome::Appended("x".to_owned())
        );
        assert_eq!(builder.phrase(), "xx");
    }

    #[test]
    fn undo_on_empty_buffer_is_a_noop() {
        let mut builder = PhraseBuilder::default();
        assert!(!builder.undo());
        assert_eq!(builder.phrase(), "");
    }

    #[test]
    fn undo_removes_last_character() {
        let mut builder = PhraseBuilder::default();
        let t0 = Instant::now();
        builder.observe(seen("a", 0.9));
        builder.commit_at(t0);
        builder.observe(seen("b", 0.9));
        builder.commit_at(t0 + DEBOUNCE_INTERVAL);

        assert!(builder.undo());
        assert_eq!(builder.phrase(), "a");
    }

    #[test]
    fn flush_empties_the_buffer_once() {
        let mut builder = PhraseBuilder::default();
        builder.observe(seen("a", 0.9));
        builder.commit_at(Instant::now());

        assert_eq!(builder.flush().as_deref(), Some("a"));
        assert_eq!(builder.flush(), None);
        assert_eq!(builder.phrase(), "");
    }

    #[test]
    fn n_commits_of_one_label_flush_to_length_n() {
        let mut builder = PhraseBuilder::default();
        let t0 = Instant::now();
        for i in 0..4u32 {
            builder.observe(seen("k", 0.9));
            builder.commit_at(t0 + DEBOUNCE_INTERVAL * i);
        }
        let phrase = builder.flush().unwrap();
        assert_eq!(phrase.chars().count(), 4);
    }
}
