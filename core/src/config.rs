//! Catalog description: serde types for declaring graphs and identities
//!
//! Used by driving adapters (the CLI, test fixtures) to assemble a
//! [`MemoryCatalog`] from YAML or JSON:
//!
//! ```yaml
//! data_dir: /var/lib/collectd/rrd
//! graphs:
//!   - title: CPU usage
//!     select: { host: /any/, plugin: cpu, plugin_instance: /any/, type: cpu, type_instance: /all/ }
//! instances:
//!   - { host: db1, plugin: cpu, plugin_instance: "0", type: cpu, type_instance: idle }
//!   - { host: db1, plugin: load, type: load, mtime: "2024-03-01T12:00:00Z" }
//! ```
//!
//! Wildcard tokens are accepted in `select` only; instances must be concrete.

use crate::{GraphConfig, GraphIdent, GraphInstance, IdentError, MemoryCatalog};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;

/// Errors from loading a catalog description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The description file could not be read.
    #[error("failed to read catalog description: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON was malformed or did not fit the schema.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML was malformed or did not fit the schema.
    #[cfg(feature = "config")]
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A graph or instance entry was rejected.
    #[error("{entry}: {source}")]
    Invalid {
        /// Which entry, e.g. `graphs[2]`.
        entry: String,
        /// Why it was rejected.
        #[source]
        source: IdentError,
    },
}

fn default_true() -> bool {
    true
}

/// Top-level catalog description.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory holding the backing files, for [`GraphIdent::to_file`].
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Whether unmatched instances get a default configuration.
    #[serde(default = "default_true")]
    pub default_configs: bool,
    /// Graph configurations, in precedence order.
    #[serde(default)]
    pub graphs: Vec<GraphSpec>,
    /// Concrete identities.
    #[serde(default)]
    pub instances: Vec<InstanceSpec>,
}

/// One graph configuration entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphSpec {
    /// Display title; the selector's display form when absent.
    #[serde(default)]
    pub title: Option<String>,
    /// Selector that claims instances for this configuration.
    pub select: GraphIdent,
}

/// One instance entry: the five fields plus an optional modification time.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceSpec {
    /// The five fields, inline in the entry. Must be concrete.
    #[serde(flatten)]
    pub ident: GraphIdent,
    /// Last modification of the backing file, RFC 3339.
    #[serde(default)]
    pub mtime: Option<DateTime<Utc>>,
}

impl CatalogConfig {
    /// Parse a JSON description.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a YAML description.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Yaml`] on malformed input.
    #[cfg(feature = "config")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a description file: JSON for `.json`, YAML otherwise.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, or a parse error.
    #[cfg(feature = "config")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        tracing::debug!(path = %path.display(), json = is_json, "loading catalog description");
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Assemble the described catalog.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first instance with a wildcard.
    pub fn build(&self) -> Result<MemoryCatalog, ConfigError> {
        let mut builder = MemoryCatalog::builder().default_configs(self.default_configs);
        for spec in &self.graphs {
            let mut config = GraphConfig::new(spec.select.clone());
            if let Some(title) = &spec.title {
                config = config.with_title(title.clone());
            }
            builder = builder.graph(config);
        }
        for (index, spec) in self.instances.iter().enumerate() {
            let instance =
                GraphInstance::new(spec.ident.clone()).map_err(|source| ConfigError::Invalid {
                    entry: format!("instances[{index}]"),
                    source,
                })?;
            builder = builder.instance(match spec.mtime {
                Some(mtime) => instance.with_mtime(mtime),
                None => instance,
            });
        }
        let catalog = builder.build();
        tracing::debug!(
            configurations = catalog.len(),
            instances = catalog.instance_count(),
            "catalog built"
        );
        Ok(catalog)
    }
}
