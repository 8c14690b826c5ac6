//! `SelectionContext`: the identity a request asks for
//!
//! Requests name what they want with five parameters (`host`, `plugin`,
//! `plugin_instance`, `type`, `type_instance`), each possibly a wildcard token.
//! Decoding the request itself is up to the caller; this type only turns
//! key/value pairs into a selector.

use crate::{Field, FieldValue, GraphIdent, IdentError};
use std::fmt;

/// A selector built from request parameters.
///
/// # Example
///
/// ```
/// use gident::SelectionContext;
///
/// let ctx = SelectionContext::from_query("action=graph&host=db1&plugin=cpu&type=cpu&type_instance=%2Fall%2F").unwrap();
/// assert_eq!(ctx.selector().to_string(), "db1/cpu/cpu-/all/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    selector: GraphIdent,
}

impl SelectionContext {
    /// Wrap an existing selector or identity.
    #[must_use]
    pub fn new(selector: GraphIdent) -> Self {
        Self { selector }
    }

    /// Build from key/value parameters.
    ///
    /// Keys other than the five field names are ignored; a repeated key keeps
    /// its last value. Missing instance fields are empty.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if `host`, `plugin` or `type` is missing
    /// or empty.
    pub fn from_params<I, K, V>(params: I) -> Result<Self, IdentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values: [Option<FieldValue>; 5] = Default::default();
        for (key, value) in params {
            if let Some(field) = Field::from_name(key.as_ref()) {
                values[field.index()] = Some(FieldValue::parse(value.as_ref()));
            }
        }

        let mut fields: [FieldValue; 5] = Default::default();
        for field in Field::ALL {
            match values[field.index()].take() {
                Some(value) => fields[field.index()] = value,
                None if field.is_required() => {
                    return Err(IdentError::InvalidArgument {
                        reason: format!("request parameter \"{field}\" is missing"),
                    });
                }
                None => {}
            }
        }
        GraphIdent::from_fields(fields).map(Self::new)
    }

    /// Build from a URL query string (`application/x-www-form-urlencoded`).
    ///
    /// # Errors
    ///
    /// Same as [`from_params`](Self::from_params).
    pub fn from_query(query: &str) -> Result<Self, IdentError> {
        Self::from_params(url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()))
    }

    /// The requested selector.
    #[must_use]
    pub fn selector(&self) -> &GraphIdent {
        &self.selector
    }

    /// Consume the context, returning the selector.
    #[must_use]
    pub fn into_selector(self) -> GraphIdent {
        self.selector
    }
}

impl From<GraphIdent> for SelectionContext {
    fn from(selector: GraphIdent) -> Self {
        Self::new(selector)
    }
}

impl fmt::Display for SelectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}
