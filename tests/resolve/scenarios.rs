//! BDD scenarios for catalogue resolution.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ResolveContext, resolve_context};

#[scenario(
    path = "tests/features/resolve.feature",
    name = "A fragment resolves to the first matching entry"
)]
fn scenario_fragment(resolve_context: ResolveContext) {
    drop(resolve_context);
}

#[scenario(
    path = "tests/features/resolve.feature",
    name = "Listing order decides between several matches"
)]
fn scenario_listing_order(resolve_context: ResolveContext) {
    drop(resolve_context);
}

#[scenario(
    path = "tests/features/resolve.feature",
    name = "Exact matching ignores case only"
)]
fn scenario_exact(resolve_context: ResolveContext) {
    drop(resolve_context);
}

#[scenario(
    path = "tests/features/resolve.feature",
    name = "An empty catalogue has no match"
)]
fn scenario_empty(resolve_context: ResolveContext) {
    drop(resolve_context);
}
