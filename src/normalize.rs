//! Case-folding helpers shared by the resolver.
//!
//! Folding is ASCII only. Names in provider catalogues are ASCII in practice,
//! and locale-aware folding would make matches depend on the host.

use std::borrow::Cow;

/// Folds `text` to ASCII lowercase, borrowing when nothing needs to change.
#[must_use]
pub fn fold(text: &str) -> Cow<'_, str> {
    if text.bytes().any(|byte| byte.is_ascii_uppercase()) {
        Cow::Owned(text.to_ascii_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// Returns `true` when `haystack` contains `needle`, ignoring ASCII case.
///
/// An empty `needle` is contained in every haystack.
#[must_use]
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(fold(needle).as_ref())
}

/// Returns `true` when both strings are equal, ignoring ASCII case.
#[must_use]
pub fn eq_folded(lhs: &str, rhs: &str) -> bool {
    lhs.eq_ignore_ascii_case(rhs)
}
