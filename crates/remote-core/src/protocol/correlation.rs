//! Correlation-id generation for outbound commands.
//!
//! Every command carries a process-wide unique, strictly increasing `id`.
//! The server echoes nothing today, but the id enables request/response
//! matching later and lets the server detect replayed commands.
//!
//! The handheld apps historically used the wall-clock millisecond timestamp
//! as the id, which collides when two commands fire inside the same
//! millisecond (easy to do with `mouse_move` bursts).  [`CommandIdSource`]
//! keeps the familiar millisecond magnitude by seeding from the clock once,
//! then increments atomically so ids never repeat.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A thread-safe, strictly increasing source of command correlation ids.
///
/// Seeded with the Unix epoch in milliseconds at construction; each call to
/// [`next`](CommandIdSource::next) returns the current value and advances by
/// one.  Lock-free.
///
/// # Examples
///
/// ```rust
/// use remote_core::CommandIdSource;
///
/// let ids = CommandIdSource::new();
/// let a = ids.next();
/// let b = ids.next();
/// assert!(b > a);
/// ```
#[derive(Debug)]
pub struct CommandIdSource {
    inner: AtomicU64,
}

impl CommandIdSource {
    /// Creates a source seeded with the current wall clock in milliseconds.
    pub fn new() -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self::starting_at(epoch_ms)
    }

    /// Creates a source starting at an explicit value.  Used by tests and by
    /// anyone who needs reproducible ids.
    pub fn starting_at(first: u64) -> Self {
        Self {
            inner: AtomicU64::new(first),
        }
    }

    /// Returns the next id and advances the counter.
    ///
    /// `Ordering::Relaxed` suffices: ids only need to be unique and
    /// increasing, they carry no cross-thread memory-ordering obligations.
    pub fn next(&self) -> u64 {
        self.inner.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for CommandIdSource {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_are_strictly_increasing() {
        let ids = CommandIdSource::starting_at(100);
        let values: Vec<u64> = (0..1000).map(|_| ids.next()).collect();
        for window in values.windows(2) {
            assert!(window[1] > window[0], "ids must be strictly increasing");
        }
    }

    #[test]
    fn test_starting_at_returns_seed_first() {
        let ids = CommandIdSource::starting_at(42);
        assert_eq!(ids.next(), 42);
        assert_eq!(ids.next(), 43);
    }

    #[test]
    fn test_new_seeds_with_millisecond_magnitude() {
        // Seed must be in the same ballpark as the current epoch millis so
        // ids remain comparable to the timestamps older clients sent.
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let first = CommandIdSource::new().next();
        let after = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        assert!(first >= before && first <= after);
    }

    #[test]
    fn test_ids_are_unique_across_threads() {
        let ids = Arc::new(CommandIdSource::starting_at(0));
        let thread_count = 8;
        let per_thread = 1000;

        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..per_thread).map(|_| ids.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked"))
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(
            all.len(),
            thread_count * per_thread,
            "no id may be handed out twice"
        );
    }
}
