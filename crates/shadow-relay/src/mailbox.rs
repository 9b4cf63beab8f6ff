use crate::error::Result;

/// One-slot mailbox holding the last dispatched whole word. Reading is
/// split into `peek` and `clear` so the caller controls exactly when the
/// slot empties (speak first, then mark as read).
pub trait Mailbox {
    fn store(&mut self, word: &str) -> Result<()>;
    fn peek(&self) -> Result<Option<String>>;
    fn clear(&mut self) -> Result<()>;

    /// Read-and-empty in one step.
    fn take(&mut self) -> Result<Option<String>> {
        let word = self.peek()?;
        if word.is_some() {
            self.clear()?;
        }
        Ok(word)
    }
}

/// In-memory slot for tests and single-process runs.
#[derive(Debug, Default)]
pub struct MemoryMailbox {
    slot: Option<String>,
}

impl Mailbox for MemoryMailbox {
    fn store(&mut self, word: &str) -> Result<()> {
        self.slot = Some(word.to_owned());
        Ok(())
    }

    fn peek(&self) -> Result<Option<String>> {
        Ok(self.slot.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}
