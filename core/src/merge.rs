//! Selector merge: resolve a selector's wildcards against a candidate
//!
//! [`copy_with_selector`] walks the five fields and, per field:
//!
//! - keeps a literal from the selector (the selector wins);
//! - replaces `All` with the candidate's value when [`MergeFlags::REPLACE_ALL`] is set;
//! - replaces `Any` with the candidate's value when [`MergeFlags::REPLACE_ANY`] is set;
//! - otherwise keeps the wildcard.
//!
//! With both flags a selector becomes the concrete identity of a known
//! instance. With none, wildcards survive, which is how a less specific
//! selector is derived from another.

use crate::{Field, FieldValue, GraphIdent, IdentError};
use bitflags::bitflags;

bitflags! {
    /// Which wildcards [`copy_with_selector`] resolves. Applies to every field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MergeFlags: u8 {
        /// Resolve `/all/` fields from the candidate.
        const REPLACE_ALL = 0x01;
        /// Resolve `/any/` fields from the candidate.
        const REPLACE_ANY = 0x02;
        /// Resolve both kinds of wildcard.
        const REPLACE_BOTH = Self::REPLACE_ALL.bits() | Self::REPLACE_ANY.bits();
    }
}

impl MergeFlags {
    /// Resolve nothing.
    pub const NONE: Self = Self::empty();

    fn resolves(self, value: &FieldValue) -> bool {
        match value {
            FieldValue::All => self.contains(Self::REPLACE_ALL),
            FieldValue::Any => self.contains(Self::REPLACE_ANY),
            FieldValue::Literal(_) => false,
        }
    }
}

/// Build a new identity from `selector`, resolving wildcards from `candidate`.
///
/// The candidate is not required to match the selector: literals in the
/// selector win regardless of the candidate's value.
///
/// # Errors
///
/// - [`IdentError::Unresolvable`] if a wildcard would be resolved against a
///   candidate field that is itself a wildcard.
/// - [`IdentError::InvalidArgument`] if resolution leaves host, plugin or type
///   empty.
///
/// Nothing is returned on error; there are no partial results.
///
/// # Example
///
/// ```
/// use gident::{copy_with_selector, GraphIdent, MergeFlags};
///
/// let selector = GraphIdent::selector("/all/", "cpu", "/any/", "cpu", "/all/").unwrap();
/// let ident = GraphIdent::new("db1", "cpu", "0", "cpu", "idle").unwrap();
///
/// let graph = copy_with_selector(&selector, &ident, MergeFlags::REPLACE_ANY).unwrap();
/// assert_eq!(graph.to_string(), "/all//cpu-0/cpu-/all/");
///
/// let concrete = copy_with_selector(&selector, &ident, MergeFlags::REPLACE_BOTH).unwrap();
/// assert_eq!(concrete, ident);
/// ```
pub fn copy_with_selector(
    selector: &GraphIdent,
    candidate: &GraphIdent,
    flags: MergeFlags,
) -> Result<GraphIdent, IdentError> {
    let mut fields: [FieldValue; 5] = Default::default();
    for field in Field::ALL {
        let wanted = selector.get_field(field);
        fields[field.index()] = if flags.resolves(wanted) {
            resolve(field, candidate.get_field(field))?
        } else {
            wanted.clone()
        };
    }
    GraphIdent::from_fields(fields)
}

fn resolve(field: Field, candidate: &FieldValue) -> Result<FieldValue, IdentError> {
    if candidate.is_wildcard() {
        return Err(IdentError::Unresolvable {
            field,
            value: candidate.to_string(),
        });
    }
    Ok(candidate.clone())
}

impl GraphIdent {
    /// Method form of [`copy_with_selector`], with `self` as the selector.
    ///
    /// # Errors
    ///
    /// See [`copy_with_selector`].
    pub fn copy_with_selector(
        &self,
        candidate: &GraphIdent,
        flags: MergeFlags,
    ) -> Result<GraphIdent, IdentError> {
        copy_with_selector(self, candidate, flags)
    }
}
