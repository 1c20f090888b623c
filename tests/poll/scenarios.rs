//! BDD scenarios for the bounded poller.

use rstest_bdd_macros::scenario;

use super::test_helpers::{PollContext, poll_context};

#[scenario(
    path = "tests/features/poll.feature",
    name = "Target reached on the first fetch"
)]
fn scenario_first_fetch(poll_context: PollContext) {
    drop(poll_context);
}

#[scenario(
    path = "tests/features/poll.feature",
    name = "Intermediate states are reported to the observer"
)]
fn scenario_intermediate_states(poll_context: PollContext) {
    drop(poll_context);
}

#[scenario(path = "tests/features/poll.feature", name = "An error state ends the wait")]
fn scenario_error_state(poll_context: PollContext) {
    drop(poll_context);
}

#[scenario(
    path = "tests/features/poll.feature",
    name = "The budget runs out before the target is reached"
)]
fn scenario_budget_exhausted(poll_context: PollContext) {
    drop(poll_context);
}

#[scenario(
    path = "tests/features/poll.feature",
    name = "A cancelled wait stops without fetching"
)]
fn scenario_cancelled(poll_context: PollContext) {
    drop(poll_context);
}
