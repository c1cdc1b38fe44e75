use std::sync::atomic::{AtomicU64, Ordering};

use galleria_core::artifact::{ArtifactId, now_millis};

/// Mints artifact ids from the wall clock, never handing out the same value
/// twice.
///
/// When two calls land in the same millisecond (or the clock steps back) the
/// second id is bumped to `last + 1`, so ids stay numeric, strictly
/// increasing and close to real time. Uniqueness holds per clock instance;
/// share one clock between every store that writes into the same namespace.
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicU64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> ArtifactId {
        self.next_at(now_millis())
    }

    pub(crate) fn next_at(&self, now: u64) -> ArtifactId {
        let bump = |last: u64| now.max(last.saturating_add(1));
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(bump(last)))
            .unwrap_or_else(|last| last);
        ArtifactId::from_millis(bump(previous))
    }
}
