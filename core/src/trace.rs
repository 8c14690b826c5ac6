//! Evaluation trace types for debugging selector matches.
//!
//! A [`MatchTrace`] captures the same result as [`matches()`](crate::matches)
//! plus the per-field decisions taken to reach it. Use
//! [`matches_with_trace()`](crate::matches_with_trace) to produce one.
//!
//! # Example
//!
//! ```
//! use gident::{matches_with_trace, GraphIdent};
//!
//! let selector = GraphIdent::selector("db1", "/any/", "", "load", "").unwrap();
//! let ident = GraphIdent::new("db1", "load", "", "load", "").unwrap();
//! let trace = matches_with_trace(&selector, &ident);
//! for step in &trace.steps {
//!     println!("{}: {} vs {} -> {}", step.field, step.selector, step.candidate, step.matched);
//! }
//! assert!(trace.matched);
//! ```

use crate::{Field, FieldValue};
use std::fmt;

/// One evaluated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStep {
    /// Which field was compared.
    pub field: Field,
    /// The selector's value for this field.
    pub selector: FieldValue,
    /// The candidate's value for this field.
    pub candidate: FieldValue,
    /// Whether the field matched.
    pub matched: bool,
}

/// Trace of a full selector match.
///
/// # INV: `matched` == `matches()` result
///
/// `steps` lists the fields in evaluation order, ending at the first
/// mismatch when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTrace {
    /// The overall result.
    pub matched: bool,
    /// Evaluated fields, in order.
    pub steps: Vec<FieldStep>,
}

impl MatchTrace {
    /// The step that failed the match, if any.
    #[must_use]
    pub fn first_mismatch(&self) -> Option<&FieldStep> {
        self.steps.iter().find(|s| !s.matched)
    }
}

impl fmt::Display for FieldStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.matched { "ok" } else { "MISMATCH" };
        write!(
            f,
            "{:<15} selector={:?} candidate={:?} {verdict}",
            self.field.name(),
            self.selector.as_str(),
            self.candidate.as_str()
        )
    }
}

impl fmt::Display for MatchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{step}")?;
        }
        write!(f, "{}", if self.matched { "match" } else { "no match" })
    }
}
