//! gident-test: sample data and conformance fixtures for gident
//!
//! Provides a small, realistic catalog of collectd-style identities for tests
//! and benches, and (with the default `fixtures` feature) a runner for the YAML
//! conformance fixtures under `fixtures/`.
//!
//! # Example
//!
//! ```
//! use gident_test::prelude::*;
//!
//! let catalog = sample_catalog()?;
//! let titles: Vec<String> = catalog.configurations().map(GraphConfig::title).collect();
//! assert_eq!(titles[0], "CPU usage");
//! # Ok::<(), IdentError>(())
//! ```

use gident::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Identities of the sample catalog, in display form.
pub const SAMPLE_IDENTS: &[&str] = &[
    "db1/cpu-0/cpu-idle",
    "db1/cpu-0/cpu-user",
    "db1/cpu-1/cpu-idle",
    "db1/cpu-1/cpu-user",
    "db1/load/load",
    "db1/memory/memory-free",
    "db1/memory/memory-used",
    "db2/interface-eth0/if_octets",
    "db2/interface-eth0/if_errors",
    "db2/load/load",
    "web1/df/df-root",
];

/// Parse a display-form identity or selector.
///
/// # Errors
///
/// [`IdentError::InvalidArgument`] if `s` is not of the form
/// `host/plugin[-plugin_instance]/type[-type_instance]`.
pub fn ident(s: &str) -> Result<GraphIdent, IdentError> {
    s.parse()
}

/// A catalog of [`SAMPLE_IDENTS`] under three configurations.
///
/// `CPU usage` and `Load` cover the cpu and load identities; everything else
/// lands in default configurations.
///
/// # Errors
///
/// Only if the sample data itself is malformed.
pub fn sample_catalog() -> Result<MemoryCatalog, IdentError> {
    let mut builder = MemoryCatalog::builder()
        .graph(GraphConfig::new(ident("/any//cpu-/any//cpu-/all/")?).with_title("CPU usage"))
        .graph(GraphConfig::new(ident("/any//load/load")?).with_title("Load"))
        .graph(GraphConfig::new(ident("/any//memory/memory-/all/")?).with_title("Memory"));
    for s in SAMPLE_IDENTS {
        builder = builder.ident(ident(s)?)?;
    }
    Ok(builder.build())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{ident, sample_catalog, SAMPLE_IDENTS};
    pub use gident::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_groups_by_configuration() {
        let catalog = sample_catalog().unwrap();
        assert_eq!(catalog.instance_count(), SAMPLE_IDENTS.len());

        let titles: Vec<String> = catalog.configurations().map(GraphConfig::title).collect();
        assert_eq!(
            titles,
            [
                "CPU usage",
                "Load",
                "Memory",
                "db2/interface-eth0/if_errors-/all/",
                "db2/interface-eth0/if_octets-/all/",
                "web1/df/df-/all/",
            ]
        );
    }

    #[test]
    fn sample_catalog_resolves_requests() {
        let catalog = sample_catalog().unwrap();
        let ctx = SelectionContext::from_query("host=db2&plugin=load&type=load").unwrap();
        let (config, instance) = catalog.resolve(&ctx).unwrap();
        assert_eq!(config.title(), "Load");
        assert_eq!(instance.ident().to_string(), "db2/load/load");
    }

    #[test]
    fn flat_listing_covers_every_sample() {
        let catalog = sample_catalog().unwrap();
        assert_eq!(flat_records(&catalog).len(), SAMPLE_IDENTS.len());
    }
}
