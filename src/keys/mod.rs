mod console;

pub use console::ConsoleKeyboard;

/// Process-wide key-press primitive.
///
/// Implementations are invoked concurrently from player threads and must
/// tolerate that without external locking. Injecting into a real input stack
/// (and any privilege elevation it needs) belongs to the implementation, not
/// to the player.
pub trait Keyboard: Send + Sync {
    fn press(&self, key: &str) -> anyhow::Result<()>;
}
