//! Shared fixtures for poll BDD scenarios.

use std::time::Duration;

use lookout::test_support::ScriptedStatus;
use lookout::{PollOutcome, PollSettings};
use rstest::fixture;

/// Outcome type produced by the scenarios.
pub type ScenarioOutcome = PollOutcome<ScriptedStatus, String>;

#[derive(Clone, Debug)]
pub struct PollContext {
    pub settings: PollSettings,
    pub fallback: ScriptedStatus,
    pub queued: Vec<ScriptedStatus>,
    pub cancelled: bool,
    pub observed: Vec<String>,
    pub fetches: usize,
    pub outcome: Option<ScenarioOutcome>,
}

#[fixture]
pub fn poll_context() -> PollContext {
    PollContext {
        settings: PollSettings::new(Duration::from_secs(1), Duration::from_secs(10)),
        fallback: ScriptedStatus::with_status("BUILD"),
        queued: Vec::new(),
        cancelled: false,
        observed: Vec::new(),
        fetches: 0,
        outcome: None,
    }
}
