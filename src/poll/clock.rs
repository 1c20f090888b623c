//! Time sources for the poller.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

/// Future returned by [`Clock::sleep`].
pub type ClockFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Source of the current time and of delays between poll attempts.
///
/// The poller only ever measures time through this trait, so a test double
/// can advance virtual time instead of waiting.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Suspends the caller for `duration`.
    fn sleep(&self, duration: Duration) -> ClockFuture<'_>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) -> ClockFuture<'_> {
        (**self).sleep(duration)
    }
}

/// Wall clock backed by the Tokio timer.
///
/// Both `now` and `sleep` read the Tokio clock, so a runtime with paused time
/// sees a consistent timeline.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn sleep(&self, duration: Duration) -> ClockFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}
