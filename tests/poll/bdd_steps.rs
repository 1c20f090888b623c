//! BDD step definitions for bounded polling.

use std::time::Duration;

use lookout::test_support::{ManualClock, ScriptedStates, ScriptedStatus};
use lookout::{PollOutcome, PollSettings, PollSettingsError, Poller};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use super::test_helpers::PollContext;

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Settings(#[from] PollSettingsError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a poller with interval {interval:u64} and timeout {timeout:u64} seconds")]
fn poller_with_budget(mut poll_context: PollContext, interval: u64, timeout: u64) -> PollContext {
    poll_context.settings =
        PollSettings::new(Duration::from_secs(interval), Duration::from_secs(timeout));
    poll_context
}

#[given("the resource always reports \"{status}\"")]
fn resource_reports(mut poll_context: PollContext, status: String) -> PollContext {
    poll_context.fallback = ScriptedStatus::with_status(&status);
    poll_context
}

#[given("the resource reports \"{status}\" until fetch {fetch:usize} reports \"{target}\"")]
fn resource_settles_on_fetch(
    mut poll_context: PollContext,
    status: String,
    fetch: usize,
    target: String,
) -> PollContext {
    poll_context.queued = vec![ScriptedStatus::with_status(&status); fetch.saturating_sub(1)];
    poll_context.fallback = ScriptedStatus::with_status(&target);
    poll_context
}

#[given("the resource fails in \"{status}\" with error \"{error}\"")]
fn resource_fails(mut poll_context: PollContext, status: String, error: String) -> PollContext {
    poll_context.fallback = ScriptedStatus::failed(&status, &error);
    poll_context
}

#[given("the wait has been cancelled")]
fn wait_cancelled(mut poll_context: PollContext) -> PollContext {
    poll_context.cancelled = true;
    poll_context
}

#[when("I poll until the resource is \"{target}\"")]
fn poll_until(poll_context: PollContext, target: String) -> Result<PollContext, StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let script = poll_context
        .queued
        .iter()
        .cloned()
        .fold(ScriptedStates::<_, String>::new(Ok(poll_context.fallback.clone())), |script, state| {
            script.then_state(state)
        });
    let cancel = CancellationToken::new();
    if poll_context.cancelled {
        cancel.cancel();
    }
    let poller =
        Poller::with_clock(poll_context.settings, ManualClock::new())?.with_cancellation(cancel);

    let mut observed = Vec::new();
    let result = runtime.block_on(poller.poll(
        script.fetcher(),
        |state: &ScriptedStatus| state.is(&target),
        |state: &ScriptedStatus| observed.push(state.status.clone()),
    ));
    let outcome = result.map_err(|err| StepError::Assertion(format!("fetch failed: {err}")))?;

    Ok(PollContext {
        fetches: script.fetches(),
        observed,
        outcome: Some(outcome),
        ..poll_context
    })
}

#[then("the poll succeeds after {count:usize} fetches")]
fn poll_succeeds(poll_context: &PollContext, count: usize) -> Result<(), StepError> {
    match &poll_context.outcome {
        Some(PollOutcome::Succeeded(_)) => expect_fetches(poll_context, count),
        other => Err(StepError::Assertion(format!("expected success, got {other:?}"))),
    }
}

#[then("the poll fails with \"{message}\"")]
fn poll_fails(poll_context: &PollContext, message: String) -> Result<(), StepError> {
    match &poll_context.outcome {
        Some(PollOutcome::Failed(reported)) if *reported == message => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected failure '{message}', got {other:?}"
        ))),
    }
}

#[then("the poll times out after {count:usize} fetches")]
fn poll_times_out(poll_context: &PollContext, count: usize) -> Result<(), StepError> {
    match &poll_context.outcome {
        Some(PollOutcome::TimedOut) => expect_fetches(poll_context, count),
        other => Err(StepError::Assertion(format!("expected timeout, got {other:?}"))),
    }
}

#[then("the poll is cancelled after {count:usize} fetches")]
fn poll_cancelled(poll_context: &PollContext, count: usize) -> Result<(), StepError> {
    match &poll_context.outcome {
        Some(PollOutcome::Cancelled) => expect_fetches(poll_context, count),
        other => Err(StepError::Assertion(format!("expected cancellation, got {other:?}"))),
    }
}

#[then("the observer saw {count:usize} states")]
fn observer_saw(poll_context: &PollContext, count: usize) -> Result<(), StepError> {
    if poll_context.observed.len() == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} observed states, got {:?}",
            poll_context.observed
        )))
    }
}

fn expect_fetches(poll_context: &PollContext, count: usize) -> Result<(), StepError> {
    if poll_context.fetches == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} fetches, got {}",
            poll_context.fetches
        )))
    }
}
