//! BDD step definitions for catalogue resolution.

use lookout::{MatchMode, resolve::resolve_with};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{ResolveContext, listing_from};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a catalogue of \"{names}\"")]
fn catalogue_of(mut resolve_context: ResolveContext, names: String) -> ResolveContext {
    resolve_context.listing = listing_from(&names);
    resolve_context
}

#[given("an empty catalogue")]
fn empty_catalogue(mut resolve_context: ResolveContext) -> ResolveContext {
    resolve_context.listing.clear();
    resolve_context
}

#[when("I resolve \"{query}\"")]
fn resolve_fragment(resolve_context: ResolveContext, query: String) -> ResolveContext {
    run(resolve_context, MatchMode::Substring, &query)
}

#[when("I resolve \"{query}\" exactly")]
fn resolve_exactly(resolve_context: ResolveContext, query: String) -> ResolveContext {
    run(resolve_context, MatchMode::Exact, &query)
}

#[then("the match is \"{name}\"")]
fn match_is(resolve_context: &ResolveContext, name: String) -> Result<(), StepError> {
    match &resolve_context.matched {
        Some(item) if item.name == name => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected '{name}', got {other:?}"
        ))),
    }
}

#[then("there is no match")]
fn no_match(resolve_context: &ResolveContext) -> Result<(), StepError> {
    match &resolve_context.matched {
        None => Ok(()),
        Some(item) => Err(StepError::Assertion(format!(
            "expected no match, got '{}'",
            item.name
        ))),
    }
}

fn run(resolve_context: ResolveContext, mode: MatchMode, query: &str) -> ResolveContext {
    let matched = resolve_with(mode, query, resolve_context.listing.iter().cloned()).into_option();
    ResolveContext {
        matched,
        ..resolve_context
    }
}
