//! Selector matching: does a candidate identity satisfy a selector?
//!
//! Fields are evaluated in [`Field::ALL`] order and the result is the AND of
//! the per-field results:
//!
//! | Selector field | Matches when |
//! |---|---|
//! | [`FieldValue::All`] | always, even for an empty candidate field |
//! | [`FieldValue::Any`] | the candidate field is non-empty |
//! | [`FieldValue::Literal`] | the candidate field is equal, ignoring case |
//!
//! Literal comparison is exact: no substring or glob semantics. A wildcard in
//! the candidate compares as its token string, so `Any` accepts it (tokens are
//! non-empty) and a literal never equals it.

use crate::{nocase, Field, FieldStep, FieldValue, GraphIdent, MatchTrace};

/// Whether `candidate` satisfies `selector`.
///
/// # INV: fixed evaluation order
///
/// Fields are checked host, plugin, plugin_instance, type, type_instance and
/// evaluation stops at the first mismatch.
/// [`matches_with_trace`] reports exactly the fields this function evaluated.
///
/// # Example
///
/// ```
/// use gident::{matches, GraphIdent};
///
/// let ident = GraphIdent::new("db1", "cpu", "", "load", "").unwrap();
/// let selector = GraphIdent::selector("db1", "/any/", "", "load", "/all/").unwrap();
/// assert!(matches(&selector, &ident));
/// ```
#[must_use]
pub fn matches(selector: &GraphIdent, candidate: &GraphIdent) -> bool {
    Field::ALL.into_iter().all(|field| {
        field_matches(selector.get_field(field), candidate.get_field(field))
    })
}

/// Match a single field value against a selector field value.
#[must_use]
pub fn field_matches(selector: &FieldValue, candidate: &FieldValue) -> bool {
    match selector {
        FieldValue::All => true,
        FieldValue::Any => !candidate.is_empty(),
        FieldValue::Literal(expected) => nocase::eq(expected, candidate.as_str()),
    }
}

/// Like [`matches`], but records every field evaluated.
///
/// # INV: `trace.matched` == `matches()` result
#[must_use]
pub fn matches_with_trace(selector: &GraphIdent, candidate: &GraphIdent) -> MatchTrace {
    let mut steps = Vec::with_capacity(Field::ALL.len());
    let mut matched = true;
    for field in Field::ALL {
        let sel = selector.get_field(field);
        let cand = candidate.get_field(field);
        let field_matched = field_matches(sel, cand);
        steps.push(FieldStep {
            field,
            selector: sel.clone(),
            candidate: cand.clone(),
            matched: field_matched,
        });
        if !field_matched {
            matched = false;
            break;
        }
    }
    MatchTrace { matched, steps }
}

impl GraphIdent {
    /// Whether `candidate` satisfies this identity used as a selector.
    ///
    /// See [`matches`].
    #[must_use]
    pub fn matches(&self, candidate: &GraphIdent) -> bool {
        matches(self, candidate)
    }

    /// Traced variant of [`GraphIdent::matches`].
    #[must_use]
    pub fn matches_with_trace(&self, candidate: &GraphIdent) -> MatchTrace {
        matches_with_trace(self, candidate)
    }
}
