use crate::arm::ArmDriver;
use crate::pauses::PauseTable;
use sign_catalog::{segment, SignCatalog, SignKind};
use sign_dispatch::{DispatchMode, SignCommand};
use std::time::Duration;
use tracing::{info, warn};

/// Turns a decoded command into arm playback. Playback faults are
/// logged and skipped; the subscriber loop must keep consuming.
pub struct Player {
    catalog: SignCatalog,
    arm: Box<dyn ArmDriver>,
    pauses: PauseTable,
    settle: Duration,
}

impl Player {
    pub fn new(
        catalog: SignCatalog,
        arm: Box<dyn ArmDriver>,
        pauses: PauseTable,
        settle: Duration,
    ) -> Self {
        Self {
            catalog,
            arm,
            pauses,
            settle,
        }
    }

    pub fn execute(&mut self, command: &SignCommand) {
        match command.mode {
            DispatchMode::WholeSign => {
                info!(token = %command.token, "playing whole sign");
                self.play_token(&command.token);
            }
            DispatchMode::SpellOut => {
                info!(token = %command.token, "spelling out");
                let mut buf = [0u8; 4];
                for ch in command.token.chars() {
                    self.play_letter(ch.encode_utf8(&mut buf));
                }
            }
        }
    }

    /// Whole-sign playback still goes through the segmenter: if the
    /// catalog has no word entry after all, the token degrades to
    /// spelling instead of being dropped.
    fn play_token(&mut self, token: &str) {
        let sequence = segment(token, &self.catalog);
        if sequence.is_empty() {
            warn!(%token, "no signs available for token");
            return;
        }
        for entry in &sequence {
            if let Err(e) = self.arm.play(entry) {
                warn!(key = %entry.key, error = %e, "playback failed, skipping sign");
            }
        }
        self.rest(token);
    }

    fn play_letter(&mut self, letter: &str) {
        match self.catalog.lookup_kind(letter, SignKind::Letter).cloned() {
            Some(entry) => {
                if let Err(e) = self.arm.play(&entry) {
                    warn!(key = %entry.key, error = %e, "playback failed, skipping sign");
                }
                self.rest(letter);
            }
            None => warn!(%letter, "no letter sign, skipping"),
        }
    }

    /// Per-token hold from the pause table, then the fixed settle time.
    fn rest(&self, token: &str) {
        if let Some(pause) = self.pauses.pause_for(token) {
            std::thread::sleep(pause);
        }
        std::thread::sleep(self.settle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::ArmDriver;
    use anyhow::anyhow;
    use sign_catalog::SignEntry;
    use std::fs::File;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingArm {
        played: Arc<Mutex<Vec<String>>>,
        fail_on: Option<String>,
    }

    impl ArmDriver for RecordingArm {
        fn play(&mut self, entry: &SignEntry) -> anyhow::Result<()> {
            if self.fail_on.as_deref() == Some(entry.key.as_str()) {
                return Err(anyhow!("servo fault"));
            }
            self.played.lock().unwrap().push(entry.key.clone());
            Ok(())
        }
    }

    fn catalog_with(names: &[&str]) -> SignCatalog {
        let tmp = tempfile::tempdir().unwrap();
        for name in names {
            File::create(tmp.path().join(format!("{name}.d6a"))).unwrap();
        }
        SignCatalog::load(tmp.path()).unwrap()
    }

    fn player_with(arm: RecordingArm, names: &[&str]) -> Player {
        Player::new(
            catalog_with(names),
            Box::new(arm),
            PauseTable::default(),
            Duration::ZERO,
        )
    }

    #[test]
    fn whole_sign_plays_the_word_entry() {
        let arm = RecordingArm::default();
        let played = arm.played.clone();
        let mut player = player_with(arm, &["word_hola", "letter_h"]);

        player.execute(&SignCommand {
            mode: DispatchMode::WholeSign,
            token: "hola".to_owned(),
        });
        assert_eq!(*played.lock().unwrap(), vec!["hola".to_owned()]);
    }

    #[test]
    fn whole_sign_without_word_entry_degrades_to_spelling() {
        let arm = RecordingArm::default();
        let played = arm.played.clone();
        let mut player = player_with(arm, &["letter_h", "letter_i"]);

        player.execute(&SignCommand {
            mode: DispatchMode::WholeSign,
            token: "hi".to_owned(),
        });
        assert_eq!(
            *played.lock().unwrap(),
            vec!["h".to_owned(), "i".to_owned()]
        );
    }

    #[test]
    fn spell_out_plays_each_known_letter() {
        let arm = RecordingArm::default();
        let played = arm.played.clone();
        let mut player = player_with(arm, &["letter_h", "letter_a"]);

        player.execute(&SignCommand {
            mode: DispatchMode::SpellOut,
            token: "haz".to_owned(),
        });
        // 'z' has no entry and is skipped.
        assert_eq!(
            *played.lock().unwrap(),
            vec!["h".to_owned(), "a".to_owned()]
        );
    }

    #[test]
    fn playback_fault_does_not_stop_the_sequence() {
        let arm = RecordingArm {
            fail_on: Some("a".to_owned()),
            ..Default::default()
        };
        let played = arm.played.clone();
        let mut player = player_with(arm, &["letter_h", "letter_a", "letter_z"]);

        player.execute(&SignCommand {
            mode: DispatchMode::SpellOut,
            token: "haz".to_owned(),
        });
        assert_eq!(
            *played.lock().unwrap(),
            vec!["h".to_owned(), "z".to_owned()]
        );
    }
}
