//! Flat listing: every instance of a catalog as a plain five-field record
//!
//! Drops configuration grouping for consumers that just want a full dump.

use crate::{Catalog, GraphIdent};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// The five raw field strings of one concrete identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Host the values were collected on.
    pub host: String,
    /// Plugin that collected them.
    pub plugin: String,
    /// Plugin instance, empty when the plugin has none.
    pub plugin_instance: String,
    /// Data-set type, serialized as `type`.
    #[serde(rename = "type")]
    pub type_: String,
    /// Type instance, empty when the type has none.
    pub type_instance: String,
}

impl From<&GraphIdent> for FlatRecord {
    fn from(ident: &GraphIdent) -> Self {
        Self {
            host: ident.host().to_owned(),
            plugin: ident.plugin().to_owned(),
            plugin_instance: ident.plugin_instance().to_owned(),
            type_: ident.type_().to_owned(),
            type_instance: ident.type_instance().to_owned(),
        }
    }
}

/// Visit a [`FlatRecord`] for every instance of every configuration.
///
/// One nested traversal of the catalog; records of a configuration come in
/// ascending identity order. A `Break` or error from `visit` ends the walk.
///
/// # Errors
///
/// The first error returned by `visit`.
pub fn enumerate_flat<C, E, F>(catalog: &C, mut visit: F) -> Result<ControlFlow<()>, E>
where
    C: Catalog,
    F: FnMut(&FlatRecord) -> Result<ControlFlow<()>, E>,
{
    catalog.for_each_configuration(|config| {
        catalog.for_each_instance(config, |_, instance| {
            visit(&FlatRecord::from(instance.ident()))
        })
    })
}

/// Collect every record of [`enumerate_flat`].
#[must_use]
pub fn flat_records<C: Catalog>(catalog: &C) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let collected: Result<_, std::convert::Infallible> = enumerate_flat(catalog, |record| {
        records.push(record.clone());
        Ok(ControlFlow::Continue(()))
    });
    match collected {
        Ok(_) => records,
        Err(never) => match never {},
    }
}
