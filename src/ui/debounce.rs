use std::time::Duration;

pub const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 300;

/// Identifies one scheduled commit. Only the newest token can settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceToken(u64);

/// Trailing-edge debounce bookkeeping for text filters.
///
/// Each keystroke calls [`Debouncer::schedule`] and starts a timer holding
/// the token. When a timer fires it calls [`Debouncer::settle`]; a newer
/// keystroke in between makes the older token stale, so only the last edit of
/// a burst commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Debouncer {
    latest: u64,
    settled: u64,
}

impl Debouncer {
    pub fn schedule(&mut self) -> DebounceToken {
        self.latest += 1;
        DebounceToken(self.latest)
    }

    /// `true` exactly once, for the newest token, if nothing cancelled it.
    pub fn settle(&mut self, token: DebounceToken) -> bool {
        if token.0 != self.latest || !self.is_pending() {
            return false;
        }
        self.settled = token.0;
        true
    }

    /// Drops whatever is scheduled, e.g. when a commit happens some other way.
    pub fn cancel(&mut self) {
        self.settled = self.latest;
    }

    pub fn is_pending(&self) -> bool {
        self.settled != self.latest
    }
}

pub fn debounce_delay(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
