//! Bounded polling of an asynchronous state transition.
//!
//! A [`Poller`] repeatedly fetches a resource's state, reports every fetched
//! state to an observer, and stops when the state carries a failure, when the
//! caller's target predicate holds, when the time budget runs out, or when a
//! [`CancellationToken`] fires. Expected stopping conditions come back as a
//! [`PollOutcome`]; only the fetch function's own errors are returned as
//! `Err`, untouched.

mod clock;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub use clock::{Clock, ClockFuture, TokioClock};

/// A polled state that may report a terminal failure.
pub trait PollState {
    /// Error payload carried by a failed state.
    type Failure;

    /// Returns the failure carried by this state, if any.
    fn failure(&self) -> Option<Self::Failure>;
}

/// Interval and overall budget for a polling run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PollSettings {
    /// Delay between consecutive fetches.
    pub interval: Duration,
    /// Total wall-clock budget, measured from the first fetch.
    pub timeout: Duration,
}

impl PollSettings {
    /// Creates settings from an interval and a timeout.
    #[must_use]
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Checks that the settings can drive a polling run.
    ///
    /// A timeout shorter than the interval is accepted; such a run performs a
    /// single fetch before timing out.
    ///
    /// # Errors
    ///
    /// Returns [`PollSettingsError::ZeroInterval`] when the interval is zero.
    pub const fn validate(&self) -> Result<(), PollSettingsError> {
        if self.interval.is_zero() {
            return Err(PollSettingsError::ZeroInterval);
        }
        Ok(())
    }

    /// Whether another sleep would reach the end of the budget.
    fn exhausted_after(&self, elapsed: Duration) -> bool {
        elapsed
            .checked_add(self.interval)
            .is_none_or(|next| next >= self.timeout)
    }
}

/// Errors raised when a [`Poller`] is configured.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum PollSettingsError {
    /// The interval between fetches must be positive.
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

/// Terminal result of a polling run.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub enum PollOutcome<S, F> {
    /// The target predicate held for this state.
    Succeeded(S),
    /// The polled resource reported a failure.
    Failed(F),
    /// The budget ran out before the target or a failure was seen.
    TimedOut,
    /// The cancellation token fired.
    Cancelled,
}

impl<S, F> PollOutcome<S, F> {
    /// Returns `true` for [`PollOutcome::Succeeded`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Short label used in log events.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Watches a resource until it reaches a target state.
#[derive(Clone, Debug)]
pub struct Poller<C = TokioClock> {
    settings: PollSettings,
    clock: C,
    cancel: Option<CancellationToken>,
}

impl Poller<TokioClock> {
    /// Creates a poller driven by the Tokio timer.
    ///
    /// # Errors
    ///
    /// Returns [`PollSettingsError`] when `settings` fail validation.
    pub fn new(settings: PollSettings) -> Result<Self, PollSettingsError> {
        Self::with_clock(settings, TokioClock)
    }
}

impl<C: Clock> Poller<C> {
    /// Creates a poller that reads time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`PollSettingsError`] when `settings` fail validation.
    pub fn with_clock(settings: PollSettings, clock: C) -> Result<Self, PollSettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            clock,
            cancel: None,
        })
    }

    /// Stops polling early once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Settings this poller was built with.
    #[must_use]
    pub const fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Polls until a terminal condition is reached.
    ///
    /// Every iteration calls `fetch` once and then `on_tick` once with the
    /// fetched state. A failure carried by the state ends the run before
    /// `is_target` is consulted. The run sleeps between fetches only while
    /// the next fetch would still start inside the budget.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `fetch`, unchanged, as soon as a fetch
    /// fails.
    pub async fn poll<S, E, Fetch, Fut, Target, Tick>(
        &self,
        mut fetch: Fetch,
        is_target: Target,
        mut on_tick: Tick,
    ) -> Result<PollOutcome<S, S::Failure>, E>
    where
        S: PollState,
        Fetch: FnMut() -> Fut,
        Fut: Future<Output = Result<S, E>>,
        Target: Fn(&S) -> bool,
        Tick: FnMut(&S),
    {
        let started = self.clock.now();
        let mut attempt: u32 = 0;

        let outcome = loop {
            if self.is_cancelled() {
                break PollOutcome::Cancelled;
            }

            attempt = attempt.saturating_add(1);
            let state = fetch().await?;
            on_tick(&state);

            let elapsed = self.clock.now().saturating_duration_since(started);
            trace!(attempt, ?elapsed, "polled state");

            if let Some(failure) = state.failure() {
                break PollOutcome::Failed(failure);
            }
            if is_target(&state) {
                break PollOutcome::Succeeded(state);
            }
            if self.settings.exhausted_after(elapsed) {
                break PollOutcome::TimedOut;
            }
            if self.is_cancelled() || self.pause().await {
                break PollOutcome::Cancelled;
            }
        };

        debug!(attempts = attempt, outcome = outcome.label(), "polling finished");
        Ok(outcome)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Sleeps for one interval; returns `true` when cancelled mid-sleep.
    async fn pause(&self) -> bool {
        let delay = self.clock.sleep(self.settings.interval);
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => true,
                () = delay => false,
            },
            None => {
                delay.await;
                false
            }
        }
    }
}
