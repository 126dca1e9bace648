//! Injected clock capability.
//!
//! Every time-dependent decision reads "now" exactly once, from a single
//! clock, in UTC. This replaces ad-hoc wall-clock reads scattered across
//! code paths, which are an easy way to end up with two notions of "now"
//! inside one decision.

use db::{naive_utc, OffsetDateTime, PrimitiveDateTime};

/// Clock capability returning a timezone-aware instant.
pub(crate) trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    /// Current instant in the naive UTC representation used for
    /// stored timestamps.
    fn now_naive(&self) -> PrimitiveDateTime {
        naive_utc(self.now())
    }
}

/// Production clock reading the system time.
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
