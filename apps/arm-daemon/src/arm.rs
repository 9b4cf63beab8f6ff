use anyhow::Result;
use sign_catalog::SignEntry;
use tracing::info;

/// The physical arm. The vendor control library is an external
/// collaborator; this trait is the seam it plugs into.
pub trait ArmDriver: Send {
    fn play(&mut self, entry: &SignEntry) -> Result<()>;
}

/// Default driver: logs what would be played. Useful on any machine
/// without the arm attached, and in tests.
pub struct LoggingArm;

impl ArmDriver for LoggingArm {
    fn play(&mut self, entry: &SignEntry) -> Result<()> {
        info!(key = %entry.key, resource = %entry.resource.display(), "playing sign");
        Ok(())
    }
}
