//! Resolution of abbreviated, human-entered names against a listing.
//!
//! Callers type things like `4gb` or `ubuntu` and expect the first catalogue
//! entry whose name contains that text. The listing supplies the order; the
//! resolver never sorts, ranks, or reorders candidates, and it stops pulling
//! from the source as soon as it finds a hit.

use tracing::debug;

use crate::normalize::{contains_folded, eq_folded};

/// An entry in a searchable listing.
pub trait Candidate {
    /// Name shown to users and compared against queries.
    fn display_name(&self) -> &str;
}

impl Candidate for str {
    fn display_name(&self) -> &str {
        self
    }
}

impl Candidate for String {
    fn display_name(&self) -> &str {
        self.as_str()
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}

/// Result of resolving a query. A missing entry is an ordinary outcome.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub enum Resolution<T> {
    /// The first candidate matching the query.
    Found(T),
    /// The listing was exhausted without a match.
    NotFound,
}

impl<T> Resolution<T> {
    /// Returns `true` when a candidate was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Borrows the matched candidate, if any.
    #[must_use]
    pub const fn found(&self) -> Option<&T> {
        match self {
            Self::Found(candidate) => Some(candidate),
            Self::NotFound => None,
        }
    }

    /// Converts into an [`Option`].
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(candidate) => Some(candidate),
            Self::NotFound => None,
        }
    }

    /// Converts into a [`Result`], building the error lazily on `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns the value produced by `err` when nothing was found.
    pub fn ok_or_else<E>(self, err: impl FnOnce() -> E) -> Result<T, E> {
        self.into_option().ok_or_else(err)
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// Comparison rule used when matching a query against display names.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MatchMode {
    /// The folded name contains the folded query.
    #[default]
    Substring,
    /// The folded name equals the folded query.
    Exact,
}

impl MatchMode {
    /// Tests a single display name against `query`.
    #[must_use]
    pub fn matches(self, name: &str, query: &str) -> bool {
        match self {
            Self::Substring => contains_folded(name, query),
            Self::Exact => eq_folded(name, query),
        }
    }
}

/// Returns the first candidate whose name contains `query`, ignoring ASCII
/// case.
///
/// The iterator is consumed only up to and including the first match. An
/// empty query matches the first candidate; an empty listing yields
/// [`Resolution::NotFound`].
pub fn resolve<I>(query: &str, candidates: I) -> Resolution<I::Item>
where
    I: IntoIterator,
    I::Item: Candidate,
{
    resolve_with(MatchMode::Substring, query, candidates)
}

/// Returns the first candidate whose whole name equals `query`, ignoring
/// ASCII case.
pub fn resolve_exact<I>(query: &str, candidates: I) -> Resolution<I::Item>
where
    I: IntoIterator,
    I::Item: Candidate,
{
    resolve_with(MatchMode::Exact, query, candidates)
}

/// Resolves `query` using the given [`MatchMode`].
pub fn resolve_with<I>(mode: MatchMode, query: &str, candidates: I) -> Resolution<I::Item>
where
    I: IntoIterator,
    I::Item: Candidate,
{
    let resolution: Resolution<I::Item> = candidates
        .into_iter()
        .find(|candidate| mode.matches(candidate.display_name(), query))
        .into();
    debug!(
        query,
        ?mode,
        found = resolution.is_found(),
        "resolved catalogue query"
    );
    resolution
}

/// Substring resolution over a fallible listing, such as a paged API call.
///
/// Iteration stops at the first match or the first error, whichever comes
/// first. Errors are returned unchanged.
///
/// # Errors
///
/// Returns the first `Err` produced by `candidates` before a match.
pub fn try_resolve<I, T, E>(query: &str, candidates: I) -> Result<Resolution<T>, E>
where
    I: IntoIterator<Item = Result<T, E>>,
    T: Candidate,
{
    for item in candidates {
        let candidate = item?;
        if MatchMode::Substring.matches(candidate.display_name(), query) {
            debug!(query, found = true, "resolved catalogue query");
            return Ok(Resolution::Found(candidate));
        }
    }
    debug!(query, found = false, "resolved catalogue query");
    Ok(Resolution::NotFound)
}
