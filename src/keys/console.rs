use std::time::{Duration, Instant};

use crate::keys::Keyboard;

/// Prints each press instead of injecting it. Doubles as a dry-run backend on
/// hosts without an input-simulation facility.
pub struct ConsoleKeyboard {
    started: Instant,
}

impl ConsoleKeyboard {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Keyboard for ConsoleKeyboard {
    fn press(&self, key: &str) -> anyhow::Result<()> {
        // [press@00:03.201: a]
        println!(
            "[press@{}: {}]",
            format_press_time(self.started.elapsed()),
            key
        );
        Ok(())
    }
}

fn format_press_time(elapsed: Duration) -> String {
    let minutes = elapsed.as_secs() / 60;
    let seconds = elapsed.as_secs() % 60;
    let fractional = elapsed.subsec_millis();
    format!("{:02}:{:02}.{:03}", minutes, seconds, fractional)
}
