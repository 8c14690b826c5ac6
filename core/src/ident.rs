//! `GraphIdent`: the five-field name of a metric stream
//!
//! An identity names one metric stream as
//! `host / plugin [-plugin_instance] / type [-type_instance]`.
//! The same type doubles as a *selector* when any field holds a wildcard
//! (see [`FieldValue`]).
//!
//! # Encodings
//!
//! | Method | Example | Contract |
//! |---|---|---|
//! | `Display` | `db1/cpu-0/cpu-idle` | human-readable, not unique |
//! | [`to_path`](GraphIdent::to_path) | `db1/cpu-0/cpu-idle` | escaped, concrete only, stable |
//! | [`to_json`](GraphIdent::to_json) | `{"host":"db1",...}` | stable key names and order |

use crate::{nocase, Field, FieldValue, IdentError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Extension of the backing resource addressed by [`GraphIdent::to_file`].
pub const FILE_EXTENSION: &str = "rrd";

/// A five-field metric stream identity, or a selector when it holds wildcards.
///
/// Equality and ordering are lexicographic over the fields in [`Field::ALL`]
/// order and ignore case.
///
/// # INV: required fields
///
/// `host`, `plugin` and `type` are never empty. Every constructor and
/// [`set_field`](Self::set_field) enforce this; a failed mutation leaves the
/// identity untouched.
///
/// # Example
///
/// ```
/// use gident::GraphIdent;
///
/// let ident = GraphIdent::new("db1", "cpu", "0", "cpu", "idle").unwrap();
/// assert_eq!(ident.to_string(), "db1/cpu-0/cpu-idle");
/// assert!(ident.is_concrete());
///
/// let selector = GraphIdent::selector("db1", "cpu", "/any/", "cpu", "/all/").unwrap();
/// assert!(selector.matches(&ident));
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "IdentRepr", into = "IdentRepr")]
pub struct GraphIdent {
    fields: [FieldValue; 5],
}

impl GraphIdent {
    /// Create a concrete identity.
    ///
    /// Every argument is taken literally; `plugin_instance` and `type_instance`
    /// may be empty.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if `host`, `plugin` or `type_` is empty,
    /// or if any argument is a wildcard token (build selectors with
    /// [`selector`](Self::selector)).
    pub fn new(
        host: impl Into<String>,
        plugin: impl Into<String>,
        plugin_instance: impl Into<String>,
        type_: impl Into<String>,
        type_instance: impl Into<String>,
    ) -> Result<Self, IdentError> {
        let ident = Self::from_raw([
            host.into(),
            plugin.into(),
            plugin_instance.into(),
            type_.into(),
            type_instance.into(),
        ])?;
        if let Some(field) = ident.first_wildcard() {
            return Err(IdentError::InvalidArgument {
                reason: format!(
                    "{field} is the wildcard \"{}\" but a concrete identity was requested; \
                     use GraphIdent::selector for selectors",
                    ident.get_field(field)
                ),
            });
        }
        Ok(ident)
    }

    /// Create a selector; `/any/` and `/all/` become wildcards.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if `host`, `plugin` or `type_` is empty.
    pub fn selector(
        host: impl Into<String>,
        plugin: impl Into<String>,
        plugin_instance: impl Into<String>,
        type_: impl Into<String>,
        type_instance: impl Into<String>,
    ) -> Result<Self, IdentError> {
        Self::from_raw([
            host.into(),
            plugin.into(),
            plugin_instance.into(),
            type_.into(),
            type_instance.into(),
        ])
    }

    /// The selector with every field set to [`FieldValue::All`].
    #[must_use]
    pub fn match_all() -> Self {
        Self {
            fields: std::array::from_fn(|_| FieldValue::All),
        }
    }

    /// Build from already-interpreted field values, in [`Field::ALL`] order.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if a required field is empty.
    pub fn from_fields(fields: [FieldValue; 5]) -> Result<Self, IdentError> {
        for field in Field::ALL {
            check_value(field, &fields[field.index()])?;
        }
        Ok(Self { fields })
    }

    fn from_raw(raw: [String; 5]) -> Result<Self, IdentError> {
        Self::from_fields(raw.map(FieldValue::parse))
    }

    /// Value of one field.
    #[must_use]
    pub fn get_field(&self, field: Field) -> &FieldValue {
        &self.fields[field.index()]
    }

    /// Replace one field. Raw strings are parsed, so `"/all/"` sets a wildcard.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if `value` is empty and `field` is
    /// required. The identity is unchanged on error.
    pub fn set_field(
        &mut self,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), IdentError> {
        let value = value.into();
        check_value(field, &value)?;
        self.fields[field.index()] = value;
        Ok(())
    }

    /// All five values, in [`Field::ALL`] order.
    #[must_use]
    pub fn fields(&self) -> &[FieldValue; 5] {
        &self.fields
    }

    /// Host name (or wildcard token).
    #[must_use]
    pub fn host(&self) -> &str {
        self.get_field(Field::Host).as_str()
    }

    /// Plugin name (or wildcard token).
    #[must_use]
    pub fn plugin(&self) -> &str {
        self.get_field(Field::Plugin).as_str()
    }

    /// Plugin instance; empty when absent.
    #[must_use]
    pub fn plugin_instance(&self) -> &str {
        self.get_field(Field::PluginInstance).as_str()
    }

    /// Type name (or wildcard token).
    #[must_use]
    pub fn type_(&self) -> &str {
        self.get_field(Field::Type).as_str()
    }

    /// Type instance; empty when absent.
    #[must_use]
    pub fn type_instance(&self) -> &str {
        self.get_field(Field::TypeInstance).as_str()
    }

    /// `true` when no field is a wildcard.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.first_wildcard().is_none()
    }

    /// First field (in evaluation order) holding a wildcard.
    #[must_use]
    pub fn first_wildcard(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| self.get_field(*f).is_wildcard())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Encodings
    // ═══════════════════════════════════════════════════════════════════════════

    /// Relative path of the resource backing this identity.
    ///
    /// Layout is `host/plugin[-plugin_instance]/type[-type_instance]`. Each
    /// field is escaped so it stays a single path component:
    ///
    /// - `%` → `%25`, `/` → `%2F`, `\` → `%5C`, NUL → `%00`
    /// - a field that is exactly `.` or `..` has every dot written as `%2E`
    ///
    /// The policy never changes; stored paths depend on it.
    ///
    /// ```
    /// use gident::GraphIdent;
    ///
    /// let ident = GraphIdent::new("web/1", "df", "", "..", "50%").unwrap();
    /// assert_eq!(ident.to_path().unwrap(), "web%2F1/df/%2E%2E-50%25");
    /// ```
    ///
    /// # Errors
    ///
    /// [`IdentError::Unresolvable`] if any field is a wildcard.
    pub fn to_path(&self) -> Result<String, IdentError> {
        if let Some(field) = self.first_wildcard() {
            return Err(IdentError::Unresolvable {
                field,
                value: self.get_field(field).to_string(),
            });
        }
        let mut path = String::new();
        path.push_str(&escape_component(self.host()));
        path.push('/');
        push_pair(
            &mut path,
            &escape_component(self.plugin()),
            &escape_component(self.plugin_instance()),
        );
        path.push('/');
        push_pair(
            &mut path,
            &escape_component(self.type_()),
            &escape_component(self.type_instance()),
        );
        Ok(path)
    }

    /// `data_dir/<to_path>.rrd`
    ///
    /// # Errors
    ///
    /// Same as [`to_path`](Self::to_path).
    pub fn to_file(&self, data_dir: impl AsRef<Path>) -> Result<PathBuf, IdentError> {
        let relative = self.to_path()?;
        Ok(data_dir
            .as_ref()
            .join(format!("{relative}.{FILE_EXTENSION}")))
    }

    /// JSON object with the five fields as string properties, in field order.
    ///
    /// Wildcards are written as their tokens.
    ///
    /// ```
    /// use gident::GraphIdent;
    ///
    /// let ident = GraphIdent::new("db1", "load", "", "load", "").unwrap();
    /// assert_eq!(
    ///     ident.to_json(),
    ///     r#"{"host":"db1","plugin":"load","plugin_instance":"","type":"load","type_instance":""}"#
    /// );
    /// ```
    #[must_use]
    pub fn to_json(&self) -> String {
        let mut object = serde_json::Map::new();
        for field in Field::ALL {
            object.insert(
                field.name().to_owned(),
                serde_json::Value::String(self.get_field(field).as_str().to_owned()),
            );
        }
        serde_json::Value::Object(object).to_string()
    }

    /// Parse the [`to_json`](Self::to_json) encoding.
    ///
    /// The instance fields may be omitted.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] for malformed JSON or an empty required field.
    pub fn from_json(json: &str) -> Result<Self, IdentError> {
        serde_json::from_str(json).map_err(|e| IdentError::InvalidArgument {
            reason: format!("invalid identity JSON: {e}"),
        })
    }
}

fn check_value(field: Field, value: &FieldValue) -> Result<(), IdentError> {
    if field.is_required() && value.is_empty() {
        return Err(IdentError::InvalidArgument {
            reason: format!("{field} must not be empty"),
        });
    }
    Ok(())
}

fn push_pair(out: &mut String, name: &str, instance: &str) {
    out.push_str(name);
    if !instance.is_empty() {
        out.push('-');
        out.push_str(instance);
    }
}

fn escape_component(value: &str) -> String {
    if value == "." || value == ".." {
        return value.replace('.', "%2E");
    }
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '\\' => out.push_str("%5C"),
            '\0' => out.push_str("%00"),
            c => out.push(c),
        }
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// Comparison
// ═══════════════════════════════════════════════════════════════════════════════

impl PartialEq for GraphIdent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GraphIdent {}

impl PartialOrd for GraphIdent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GraphIdent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fields.cmp(&other.fields)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Display / FromStr
// ═══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for GraphIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        out.push_str(self.host());
        out.push('/');
        push_pair(&mut out, self.plugin(), self.plugin_instance());
        out.push('/');
        push_pair(&mut out, self.type_(), self.type_instance());
        f.write_str(&out)
    }
}

impl fmt::Debug for GraphIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphIdent({self})")
    }
}

/// Parses the display form `host/plugin[-plugin_instance]/type[-type_instance]`.
///
/// Wildcard tokens are accepted wherever a field starts, e.g.
/// `db1//any//load-/all/`. The first `-` of the plugin and type segments
/// splits off the instance, so plugin and type names containing `-` or `/`
/// need [`GraphIdent::selector`] instead.
impl FromStr for GraphIdent {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = split_display(s);
        let [host, plugin, type_] = segments.as_slice() else {
            return Err(IdentError::InvalidArgument {
                reason: format!(
                    "\"{s}\" is not of the form host/plugin[-plugin_instance]/type[-type_instance]"
                ),
            });
        };
        let (plugin, plugin_instance) = plugin.split_once('-').unwrap_or((plugin.as_str(), ""));
        let (type_, type_instance) = type_.split_once('-').unwrap_or((type_.as_str(), ""));
        Self::selector(
            host.as_str(),
            plugin,
            plugin_instance,
            type_,
            type_instance,
        )
    }
}

/// Split on `/`, keeping wildcard tokens that start a field intact.
fn split_display(s: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        let at_field_start = current.is_empty() || current.ends_with('-');
        if at_field_start {
            if let Some(token) = leading_token(rest) {
                current.push_str(token);
                rest = &rest[token.len()..];
                continue;
            }
        }
        if c == '/' {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    segments.push(current);
    segments
}

fn leading_token(s: &str) -> Option<&str> {
    [crate::ANY_TOKEN, crate::ALL_TOKEN].into_iter().find_map(|token| {
        s.get(..token.len())
            .filter(|head| nocase::eq(head, token))
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Serde representation
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize, Deserialize)]
struct IdentRepr {
    host: FieldValue,
    plugin: FieldValue,
    #[serde(default)]
    plugin_instance: FieldValue,
    #[serde(rename = "type")]
    type_: FieldValue,
    #[serde(default)]
    type_instance: FieldValue,
}

impl TryFrom<IdentRepr> for GraphIdent {
    type Error = IdentError;

    fn try_from(repr: IdentRepr) -> Result<Self, Self::Error> {
        Self::from_fields([
            repr.host,
            repr.plugin,
            repr.plugin_instance,
            repr.type_,
            repr.type_instance,
        ])
    }
}

impl From<GraphIdent> for IdentRepr {
    fn from(ident: GraphIdent) -> Self {
        let [host, plugin, plugin_instance, type_, type_instance] = ident.fields;
        Self {
            host,
            plugin,
            plugin_instance,
            type_,
            type_instance,
        }
    }
}
