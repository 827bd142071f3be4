use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::keys::Keyboard;
use crate::note::Sheet;

/// What happened to each scheduled action once the batch has drained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub pressed: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Pressed,
    Skipped,
    Failed,
}

/// Plays a sheet by launching one timed action per note.
pub struct Player<K: Keyboard + 'static> {
    keyboard: Arc<K>,
    speed_modifier: f64,
}

impl<K: Keyboard + 'static> Player<K> {
    pub fn new(keyboard: K, speed_modifier: f64) -> Self {
        Self {
            keyboard: Arc::new(keyboard),
            speed_modifier,
        }
    }

    /// Launch every action eagerly and wait for all of them to finish.
    ///
    /// Each action independently sleeps out the shared startup delay plus its
    /// own scaled offset, then presses its key. An empty key still elapses
    /// its wait but presses nothing. A failing press is logged and counted;
    /// it never cancels sibling actions. Actions whose fire times coincide
    /// run in whatever order the OS wakes them.
    pub fn perform(&self, sheet: Sheet, startup_delay_secs: f64) -> PlaybackSummary {
        let handles: Vec<thread::JoinHandle<Outcome>> = sheet
            .into_iter()
            .map(|note| {
                let keyboard = Arc::clone(&self.keyboard);
                let delay = startup_delay_secs + note.offset_secs * self.speed_modifier;
                thread::spawn(move || {
                    thread::sleep(Duration::from_secs_f64(delay));
                    if note.key.is_empty() {
                        return Outcome::Skipped;
                    }
                    match keyboard.press(&note.key) {
                        Ok(()) => Outcome::Pressed,
                        Err(err) => {
                            log::warn!("press '{}' failed: {:#}", note.key, err);
                            Outcome::Failed
                        }
                    }
                })
            })
            .collect();

        let mut summary = PlaybackSummary::default();
        for handle in handles {
            match handle.join() {
                Ok(Outcome::Pressed) => summary.pressed += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Ok(Outcome::Failed) | Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;
    use anyhow::anyhow;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Records every press with the time elapsed since construction.
    struct Recorder {
        started: Instant,
        log: Arc<Mutex<Vec<(String, Duration)>>>,
    }

    impl Recorder {
        fn new() -> (Self, Arc<Mutex<Vec<(String, Duration)>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let recorder = Recorder {
                started: Instant::now(),
                log: Arc::clone(&log),
            };
            (recorder, log)
        }
    }

    impl Keyboard for Recorder {
        fn press(&self, key: &str) -> anyhow::Result<()> {
            self.log
                .lock()
                .unwrap()
                .push((key.to_string(), self.started.elapsed()));
            Ok(())
        }
    }

    /// Rejects one specific key, accepts everything else.
    struct Rejecting {
        bad_key: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Keyboard for Rejecting {
        fn press(&self, key: &str) -> anyhow::Result<()> {
            if key == self.bad_key {
                return Err(anyhow!("injection rejected"));
            }
            self.log.lock().unwrap().push(key.to_string());
            Ok(())
        }
    }

    fn note(offset_secs: f64, key: &str) -> Note {
        Note {
            pitch: 60,
            offset_secs,
            key: key.to_string(),
        }
    }

    #[test]
    fn actions_fire_at_startup_plus_scaled_offset() {
        let (recorder, log) = Recorder::new();
        let player = Player::new(recorder, 2.0);
        // Listed out of time order on purpose; delays decide firing order.
        let summary = player.perform(vec![note(0.1, "a"), note(0.05, "b")], 0.1);

        assert_eq!(summary.pressed, 2);
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        // "b" fires at 0.1 + 0.05*2 = 0.2s, "a" at 0.1 + 0.1*2 = 0.3s.
        assert_eq!(log[0].0, "b");
        assert_eq!(log[1].0, "a");
        assert!(log[0].1 >= Duration::from_millis(200));
        assert!(log[1].1 >= Duration::from_millis(300));
        assert!(log[1].1 > log[0].1);
    }

    #[test]
    fn empty_key_waits_but_presses_nothing() {
        let (recorder, log) = Recorder::new();
        let player = Player::new(recorder, 1.0);
        let summary = player.perform(vec![note(0.01, ""), note(0.01, "a")], 0.0);

        assert_eq!(summary.pressed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn press_failure_does_not_cancel_siblings() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let keyboard = Rejecting {
            bad_key: "x",
            log: Arc::clone(&log),
        };
        let player = Player::new(keyboard, 1.0);
        let summary = player.perform(
            vec![note(0.0, "x"), note(0.01, "a"), note(0.02, "b")],
            0.0,
        );

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pressed, 2);
        let mut pressed = log.lock().unwrap().clone();
        pressed.sort();
        assert_eq!(pressed, vec!["a", "b"]);
    }

    #[test]
    fn empty_sheet_completes_immediately() {
        let (recorder, _log) = Recorder::new();
        let player = Player::new(recorder, 1.0);
        assert_eq!(player.perform(Vec::new(), 0.0), PlaybackSummary::default());
    }
}
