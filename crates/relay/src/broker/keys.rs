//! Per-message broker keys.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-wide source of message keys.
///
/// Keys are nanoseconds since the Unix epoch, bumped as needed so that every
/// key handed out by one generator is strictly greater than the previous one,
/// even when the wall clock stalls or steps backwards.
#[derive(Debug, Default)]
pub struct MessageKeys {
    last: AtomicI64,
}

impl MessageKeys {
    /// Create a generator with no keys issued yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next key.
    pub fn next(&self) -> i64 {
        let now = unix_nanos();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn keys_are_strictly_increasing() {
        let keys = MessageKeys::new();
        let mut prev = keys.next();
        for _ in 0..10_000 {
            let next = keys.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn keys_track_wall_clock() {
        let before = unix_nanos();
        let key = MessageKeys::new().next();
        assert!(key >= before);
    }

    #[test]
    fn concurrent_keys_do_not_collide() {
        let keys = Arc::new(MessageKeys::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let keys = Arc::clone(&keys);
                std::thread::spawn(move || (0..1_000).map(|_| keys.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for key in handle.join().unwrap() {
                assert!(seen.insert(key), "duplicate key {key}");
            }
        }
        assert_eq!(seen.len(), 8_000);
    }
}
