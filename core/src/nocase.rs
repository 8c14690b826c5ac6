//! Case-insensitive text comparison
//!
//! Every comparison of identity fields goes through this module so that
//! equality, ordering, and matching agree on what "the same field" means.
//! Comparison is done on the lowercase expansion of each `char`, which makes
//! it a total order consistent with [`eq`].

use std::cmp::Ordering;

/// Compare two strings ignoring case.
///
/// The empty string sorts before every non-empty string.
///
/// ```
/// use gident::nocase;
/// use std::cmp::Ordering;
///
/// assert_eq!(nocase::cmp("CPU", "cpu"), Ordering::Equal);
/// assert_eq!(nocase::cmp("", "a"), Ordering::Less);
/// assert_eq!(nocase::cmp("Disk", "cpu"), Ordering::Greater);
/// ```
#[must_use]
pub fn cmp(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        let lhs = a.bytes().map(|c| c.to_ascii_lowercase());
        let rhs = b.bytes().map(|c| c.to_ascii_lowercase());
        return lhs.cmp(rhs);
    }
    let lhs = a.chars().flat_map(char::to_lowercase);
    let rhs = b.chars().flat_map(char::to_lowercase);
    lhs.cmp(rhs)
}

/// Equality ignoring case. Agrees with [`cmp`].
#[must_use]
pub fn eq(a: &str, b: &str) -> bool {
    cmp(a, b) == Ordering::Equal
}
