//! `MemoryCatalog`: an immutable catalog snapshot held in memory
//!
//! Built once by [`MemoryCatalogBuilder`] from graph configurations and
//! concrete identities, then only read. Refreshing means building a new
//! snapshot and swapping it in (e.g. behind an `Arc`), so a traversal never
//! observes a half-updated catalog.
//!
//! # Assignment rules
//!
//! 1. Identities are sorted ascending and case-insensitive duplicates dropped.
//! 2. Each identity joins the *first* configuration (in insertion order) whose
//!    selector matches it.
//! 3. An identity no configuration matches gets a default configuration keyed
//!    by its own fields with `type_instance = /all/`, unless default
//!    configurations are disabled, in which case it is dropped.

use crate::{Catalog, Field, FieldValue, GraphConfig, GraphIdent, GraphInstance, IdentError};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
struct Slot {
    config: GraphConfig,
    instances: Vec<GraphInstance>,
}

/// A built, read-only catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    slots: Vec<Slot>,
}

impl MemoryCatalog {
    /// Start building a catalog.
    #[must_use]
    pub fn builder() -> MemoryCatalogBuilder {
        MemoryCatalogBuilder::new()
    }

    /// Number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when there are no configurations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of instances across all configurations.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.slots.iter().map(|s| s.instances.len()).sum()
    }

    fn slot_of(&self, config: &GraphConfig) -> Option<&Slot> {
        self.slots
            .get(config.slot)
            .filter(|slot| slot.config.selector() == config.selector())
    }
}

impl Catalog for MemoryCatalog {
    fn configurations(&self) -> impl Iterator<Item = &GraphConfig> {
        self.slots.iter().map(|slot| &slot.config)
    }

    fn instances<'a>(
        &'a self,
        config: &'a GraphConfig,
    ) -> impl Iterator<Item = &'a GraphInstance> + 'a {
        self.slot_of(config)
            .map(|slot| slot.instances.as_slice())
            .unwrap_or_default()
            .iter()
    }
}

/// Builder for [`MemoryCatalog`].
///
/// # Example
///
/// ```
/// use gident::{Catalog, GraphConfig, GraphIdent, MemoryCatalog};
///
/// let catalog = MemoryCatalog::builder()
///     .graph(GraphConfig::new(GraphIdent::selector("/any/", "cpu", "/any/", "cpu", "/all/")?))
///     .ident(GraphIdent::new("db1", "cpu", "1", "cpu", "idle")?)?
///     .ident(GraphIdent::new("db1", "cpu", "0", "cpu", "idle")?)?
///     .build();
///
/// let config = catalog.configurations().next().unwrap();
/// let names: Vec<String> = catalog.instances(config).map(|i| i.ident().to_string()).collect();
/// assert_eq!(names, ["db1/cpu-0/cpu-idle", "db1/cpu-1/cpu-idle"]);
/// # Ok::<(), gident::IdentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryCatalogBuilder {
    configs: Vec<GraphConfig>,
    instances: Vec<GraphInstance>,
    default_configs: bool,
}

impl Default for MemoryCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalogBuilder {
    /// An empty builder with default configurations enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            instances: Vec::new(),
            default_configs: true,
        }
    }

    /// Add a graph configuration. Earlier configurations take precedence.
    #[must_use]
    pub fn graph(mut self, config: GraphConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Add a concrete identity.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if `ident` contains a wildcard.
    pub fn ident(self, ident: GraphIdent) -> Result<Self, IdentError> {
        Ok(self.instance(GraphInstance::new(ident)?))
    }

    /// Add a concrete identity with its last-modified time.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if `ident` contains a wildcard.
    pub fn ident_with_mtime(
        self,
        ident: GraphIdent,
        mtime: DateTime<Utc>,
    ) -> Result<Self, IdentError> {
        Ok(self.instance(GraphInstance::new(ident)?.with_mtime(mtime)))
    }

    /// Add an instance.
    #[must_use]
    pub fn instance(mut self, instance: GraphInstance) -> Self {
        self.instances.push(instance);
        self
    }

    /// Whether unmatched identities get a default configuration (default `true`).
    #[must_use]
    pub fn default_configs(mut self, enabled: bool) -> Self {
        self.default_configs = enabled;
        self
    }

    /// Assign every instance to a configuration and freeze the result.
    #[must_use]
    pub fn build(self) -> MemoryCatalog {
        let mut slots: Vec<Slot> = self
            .configs
            .into_iter()
            .map(|config| Slot {
                config,
                instances: Vec::new(),
            })
            .collect();

        let mut instances = self.instances;
        // stable: the first of several duplicates survives
        instances.sort_by(|a, b| a.ident().cmp(b.ident()));
        instances.dedup_by(|later, earlier| {
            let duplicate = later.ident() == earlier.ident();
            if duplicate {
                tracing::debug!(ident = %later.ident(), "dropping duplicate identity");
            }
            duplicate
        });

        for instance in instances {
            let slot = match slots
                .iter()
                .position(|slot| slot.config.selector().matches(instance.ident()))
            {
                Some(index) => index,
                None if self.default_configs => {
                    let config = GraphConfig::new(default_selector(instance.ident()));
                    tracing::debug!(config = %config.selector(), "created default configuration");
                    slots.push(Slot {
                        config,
                        instances: Vec::new(),
                    });
                    slots.len() - 1
                }
                None => {
                    tracing::debug!(ident = %instance.ident(), "no configuration matches identity, dropping it");
                    continue;
                }
            };
            tracing::debug!(
                ident = %instance.ident(),
                config = %slots[slot].config.selector(),
                "assigned identity to configuration"
            );
            slots[slot].instances.push(instance);
        }

        for (index, slot) in slots.iter_mut().enumerate() {
            slot.config.slot = index;
        }
        MemoryCatalog { slots }
    }
}

fn default_selector(ident: &GraphIdent) -> GraphIdent {
    let mut fields = ident.fields().clone();
    fields[Field::TypeInstance.index()] = FieldValue::All;
    // required fields come from a valid identity, so this cannot fail
    GraphIdent::from_fields(fields).unwrap_or_else(|_| ident.clone())
}
