//! gident - graph identities for collected metric streams
//!
//! Names metric streams along a fixed five-level hierarchy
//! (host → plugin → plugin instance → type → type instance), matches them
//! against wildcard selectors, expands selectors into concrete identities,
//! and walks catalogs of identities grouped into graph configurations.
//!
//! # Architecture
//!
//! - [`FieldValue`]: one field: `Literal`, `Any` (`/any/`) or `All` (`/all/`)
//! - [`GraphIdent`]: five fields; a concrete identity or a selector
//! - [`matches`]: does a candidate satisfy a selector? (+ [`MatchTrace`])
//! - [`copy_with_selector`]: resolve a selector's wildcards from a candidate
//! - [`Catalog`]: traversal over [`GraphConfig`]s and their [`GraphInstance`]s
//! - [`enumerate_flat`]: the catalog as flat [`FlatRecord`]s
//! - [`MemoryCatalog`]: immutable in-memory catalog snapshot
//!
//! # Key Invariants
//!
//! 1. **Case-insensitive everywhere**: equality, ordering and matching all go
//!    through [`nocase`].
//!
//! 2. **`Any` needs presence, `All` does not**: an empty candidate field
//!    satisfies `All` but never `Any`.
//!
//! 3. **No partial results**: a failed construction, mutation or merge leaves
//!    nothing half-built behind.
//!
//! # Example
//!
//! ```
//! use gident::prelude::*;
//!
//! let ident = GraphIdent::new("db1", "cpu", "0", "cpu", "idle")?;
//! let selector: GraphIdent = "/any//cpu-/any//cpu-/all/".parse()?;
//! assert!(selector.matches(&ident));
//!
//! let catalog = MemoryCatalog::builder()
//!     .graph(GraphConfig::new(selector).with_title("CPU"))
//!     .ident(ident)?
//!     .build();
//!
//! let records = flat_records(&catalog);
//! assert_eq!(records[0].type_instance, "idle");
//! # Ok::<(), IdentError>(())
//! ```

#![warn(missing_docs)]

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod catalog;
mod config;
mod field;
mod flat;
mod ident;
mod matcher;
mod memory;
mod merge;
pub mod nocase;
mod selection;
mod trace;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Identity model
pub use field::{Field, FieldValue, ALL_TOKEN, ANY_TOKEN};
pub use ident::{GraphIdent, FILE_EXTENSION};

// Algorithms
pub use matcher::{field_matches, matches, matches_with_trace};
pub use merge::{copy_with_selector, MergeFlags};

// Catalog
pub use catalog::{Catalog, GraphConfig, GraphInstance};
pub use flat::{enumerate_flat, flat_records, FlatRecord};
pub use memory::{MemoryCatalog, MemoryCatalogBuilder};
pub use selection::SelectionContext;

// Catalog description
pub use config::{CatalogConfig, ConfigError, GraphSpec, InstanceSpec};

// Trace types
pub use trace::{FieldStep, MatchTrace};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use gident::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Algorithms
        copy_with_selector,
        enumerate_flat,
        flat_records,
        matches,
        matches_with_trace,
        // Catalog
        Catalog,
        // Core types
        Field,
        FieldValue,
        FlatRecord,
        GraphConfig,
        GraphIdent,
        GraphInstance,
        // Errors
        IdentError,
        MatchTrace,
        MemoryCatalog,
        MergeFlags,
        SelectionContext,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from identity construction, merging and catalog lookups.
///
/// All are local and synchronous; none is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentError {
    /// A required field is missing or empty, a wildcard appeared where a
    /// concrete value is required, or an input could not be parsed.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong and how to fix it.
        reason: String,
    },

    /// No configuration or instance satisfies a selection.
    #[error("no {kind} matches selection \"{selection}\"")]
    NotFound {
        /// `"configuration"` or `"instance"`.
        kind: &'static str,
        /// Display form of the selection.
        selection: String,
    },

    /// A wildcard was asked to resolve against another wildcard, or a
    /// concrete-only encoding was requested for a selector.
    #[error("cannot resolve {field}: value \"{value}\" is a wildcard")]
    Unresolvable {
        /// The offending field.
        field: Field,
        /// The wildcard token found there.
        value: String,
    },
}
