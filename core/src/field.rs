//! `Field` and `FieldValue`: the five positions of an identity and what each may hold
//!
//! A field value is either a literal string or one of two wildcards:
//!
//! - [`FieldValue::Any`] (`/any/`) matches any non-empty value.
//! - [`FieldValue::All`] (`/all/`) matches every value, including the empty one.
//!
//! Raw strings become field values through [`FieldValue::parse`], which is the
//! only place the wildcard tokens are recognized.

use crate::{nocase, IdentError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Token for the [`FieldValue::Any`] wildcard.
pub const ANY_TOKEN: &str = "/any/";

/// Token for the [`FieldValue::All`] wildcard.
pub const ALL_TOKEN: &str = "/all/";

// ═══════════════════════════════════════════════════════════════════════════════
// Field
// ═══════════════════════════════════════════════════════════════════════════════

/// One of the five positions of a [`GraphIdent`](crate::GraphIdent).
///
/// The declaration order is the comparison and encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// The host the metric was collected on.
    Host,
    /// The collecting plugin.
    Plugin,
    /// Optional plugin instance (e.g. the CPU number).
    PluginInstance,
    /// The data set type.
    Type,
    /// Optional type instance (e.g. `idle`).
    TypeInstance,
}

impl Field {
    /// Every field in evaluation order.
    pub const ALL: [Field; 5] = [
        Field::Host,
        Field::Plugin,
        Field::PluginInstance,
        Field::Type,
        Field::TypeInstance,
    ];

    /// Position of this field within an identity.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The field's name as used in JSON keys and request parameters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::Host => "host",
            Field::Plugin => "plugin",
            Field::PluginInstance => "plugin_instance",
            Field::Type => "type",
            Field::TypeInstance => "type_instance",
        }
    }

    /// Whether this field must be non-empty.
    ///
    /// Only the two instance fields may be left empty.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Field::Host | Field::Plugin | Field::Type)
    }

    /// Look up a field by its [`name`](Self::name), ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|f| nocase::eq(f.name(), name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| IdentError::InvalidArgument {
            reason: format!(
                "unknown field \"{s}\", expected one of host, plugin, plugin_instance, type, type_instance"
            ),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FieldValue
// ═══════════════════════════════════════════════════════════════════════════════

/// The content of one identity field.
///
/// Equality and ordering are case-insensitive over [`as_str`](Self::as_str),
/// so wildcards sort as their token strings.
///
/// ```
/// use gident::FieldValue;
///
/// assert_eq!(FieldValue::parse("/ANY/"), FieldValue::Any);
/// assert_eq!(FieldValue::parse("/all/"), FieldValue::All);
/// assert_eq!(FieldValue::parse("cpu"), FieldValue::Literal("CPU".into()));
/// assert!(FieldValue::parse("").is_empty());
/// ```
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// A literal value; the empty string means "absent".
    Literal(String),
    /// Any non-empty value.
    Any,
    /// Every value, including absent.
    All,
}

impl FieldValue {
    /// Interpret a raw string, recognizing the wildcard tokens.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if nocase::eq(&raw, ANY_TOKEN) {
            Self::Any
        } else if nocase::eq(&raw, ALL_TOKEN) {
            Self::All
        } else {
            Self::Literal(raw)
        }
    }

    /// The absent value.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Literal(String::new())
    }

    /// String form: the literal, or the wildcard's token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::Any => ANY_TOKEN,
            Self::All => ALL_TOKEN,
        }
    }

    /// The literal value, or `None` for a wildcard.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Any | Self::All => None,
        }
    }

    /// `true` for the empty literal. Wildcards are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Literal(s) if s.is_empty())
    }

    /// `true` for [`Any`](Self::Any) and [`All`](Self::All).
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any | Self::All)
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        nocase::eq(self.as_str(), other.as_str())
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        nocase::cmp(self.as_str(), other.as_str())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FieldValue {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for FieldValue {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::parse)
    }
}
