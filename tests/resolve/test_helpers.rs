//! Shared fixtures for resolve BDD scenarios.

use lookout::test_support::NamedItem;
use rstest::fixture;

#[derive(Clone, Debug, Default)]
pub struct ResolveContext {
    pub listing: Vec<NamedItem>,
    pub matched: Option<NamedItem>,
}

#[fixture]
pub fn resolve_context() -> ResolveContext {
    ResolveContext::default()
}

/// Builds a listing from a comma separated list of names, numbering ids from
/// one in listing order.
pub fn listing_from(names: &str) -> Vec<NamedItem> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(idx, name)| NamedItem::new(&(idx + 1).to_string(), name))
        .collect()
}
