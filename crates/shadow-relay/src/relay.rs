use crate::error::Result;
use crate::mailbox::Mailbox;

/// Out-of-band push toward the voice assistant.
pub trait Notifier {
    fn notify(&self) -> Result<()>;
}

/// Notifier that only logs; used when no notification credentials are
/// configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self) -> Result<()> {
        tracing::info!("proactive notification skipped (no credentials)");
        Ok(())
    }
}

/// Store `word` in the mailbox, then ring the doorbell. The store comes
/// first: a notification without a stored word would wake the user to an
/// empty slot.
pub fn relay_word(mailbox: &mut dyn Mailbox, notifier: &dyn Notifier, word: &str) -> Result<()> {
    mailbox.store(word)?;
    tracing::info!(%word, "word stored in shadow mailbox");
    notifier.notify()
}
