//! Catalog enumeration: graph configurations and their instances
//!
//! A catalog groups concrete identities under *graph configurations*. Each
//! configuration is keyed by a selector; each concrete identity belongs to
//! exactly one configuration as a [`GraphInstance`].
//!
//! The [`Catalog`] trait is a traversal contract, not a container: an
//! implementation may compute configurations and instances on demand. Two
//! styles are offered:
//!
//! - iterators ([`configurations`](Catalog::configurations),
//!   [`instances`](Catalog::instances)), where early exit is a plain `break`;
//! - visitors ([`for_each_configuration`](Catalog::for_each_configuration),
//!   [`for_each_instance`](Catalog::for_each_instance)) returning
//!   `Result<ControlFlow<()>, E>`, where `Break` stops the walk and the first
//!   `Err` is handed back to the caller.
//!
//! # INV: ordering
//!
//! Configurations come in catalog order (stable for one snapshot). Instances
//! of a configuration come in ascending [`GraphIdent`] order.

use crate::{GraphIdent, IdentError, SelectionContext};
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;

// ═══════════════════════════════════════════════════════════════════════════════
// Handles
// ═══════════════════════════════════════════════════════════════════════════════

/// A grouping of concrete identities sharing one selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    selector: GraphIdent,
    title: Option<String>,
    pub(crate) slot: usize,
}

impl GraphConfig {
    /// Create a configuration keyed by `selector`.
    #[must_use]
    pub fn new(selector: GraphIdent) -> Self {
        Self {
            selector,
            title: None,
            slot: 0,
        }
    }

    /// Set the display title (builder pattern).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The selector this configuration groups by.
    #[must_use]
    pub fn selector(&self) -> &GraphIdent {
        &self.selector
    }

    /// Display title; the selector's display form when none was set.
    #[must_use]
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.selector.to_string())
    }
}

/// One concrete identity within a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInstance {
    ident: GraphIdent,
    mtime: Option<DateTime<Utc>>,
}

impl GraphInstance {
    /// Wrap a concrete identity.
    ///
    /// # Errors
    ///
    /// [`IdentError::InvalidArgument`] if `ident` contains a wildcard.
    pub fn new(ident: GraphIdent) -> Result<Self, IdentError> {
        if let Some(field) = ident.first_wildcard() {
            return Err(IdentError::InvalidArgument {
                reason: format!("instance {ident} has a wildcard in {field}"),
            });
        }
        Ok(Self { ident, mtime: None })
    }

    /// Set the last-modified time of the backing data (builder pattern).
    #[must_use]
    pub fn with_mtime(mut self, mtime: DateTime<Utc>) -> Self {
        self.mtime = Some(mtime);
        self
    }

    /// The instance's identity.
    #[must_use]
    pub fn ident(&self) -> &GraphIdent {
        &self.ident
    }

    /// Last-modified time of the backing data, when known.
    #[must_use]
    pub fn mtime(&self) -> Option<DateTime<Utc>> {
        self.mtime
    }

    /// Request parameters selecting this instance.
    ///
    /// The result is accepted by [`SelectionContext::from_query`].
    ///
    /// ```
    /// use gident::{GraphIdent, GraphInstance};
    ///
    /// let inst = GraphInstance::new(GraphIdent::new("db 1", "cpu", "0", "cpu", "idle").unwrap()).unwrap();
    /// assert_eq!(
    ///     inst.params(),
    ///     "host=db+1&plugin=cpu&plugin_instance=0&type=cpu&type_instance=idle"
    /// );
    /// ```
    #[must_use]
    pub fn params(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (field, value) in crate::Field::ALL.iter().zip(self.ident.fields()) {
            query.append_pair(field.name(), value.as_str());
        }
        query.finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only traversal over configurations and instances.
///
/// Implementors provide the two iterators; every other method is derived.
/// Callers must hold a consistent snapshot for the duration of one traversal.
pub trait Catalog {
    /// Configurations, in catalog order.
    fn configurations(&self) -> impl Iterator<Item = &GraphConfig>;

    /// Instances of `config`, in ascending identity order.
    ///
    /// Empty when `config` does not belong to this catalog.
    fn instances<'a>(
        &'a self,
        config: &'a GraphConfig,
    ) -> impl Iterator<Item = &'a GraphInstance> + 'a;

    /// Visit every configuration until `visit` breaks or fails.
    ///
    /// Returns `Break` if the visitor stopped the walk.
    ///
    /// # Errors
    ///
    /// The first error returned by `visit`; no further configuration is visited.
    fn for_each_configuration<E, F>(&self, mut visit: F) -> Result<ControlFlow<()>, E>
    where
        F: FnMut(&GraphConfig) -> Result<ControlFlow<()>, E>,
    {
        for config in self.configurations() {
            if visit(config)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Visit every instance of `config` until `visit` breaks or fails.
    ///
    /// # Errors
    ///
    /// The first error returned by `visit`.
    fn for_each_instance<E, F>(&self, config: &GraphConfig, mut visit: F) -> Result<ControlFlow<()>, E>
    where
        F: FnMut(&GraphConfig, &GraphInstance) -> Result<ControlFlow<()>, E>,
    {
        for instance in self.instances(config) {
            if visit(config, instance)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// The first configuration whose selector matches the context.
    ///
    /// The configuration's selector is the selector and the context the
    /// candidate, so both a configuration's own selector and the identity of
    /// one of its instances select it.
    fn select_current_configuration(&self, ctx: &SelectionContext) -> Option<&GraphConfig> {
        let found = self
            .configurations()
            .find(|config| config.selector().matches(ctx.selector()));
        match found {
            Some(config) => tracing::debug!(selection = %ctx, config = %config.selector(), "configuration selected"),
            None => tracing::debug!(selection = %ctx, "no configuration matches selection"),
        }
        found
    }

    /// The first instance of `config` satisfying the context as a selector.
    fn select_current_instance<'a>(
        &'a self,
        config: &'a GraphConfig,
        ctx: &SelectionContext,
    ) -> Option<&'a GraphInstance> {
        let found = self
            .instances(config)
            .find(|instance| ctx.selector().matches(instance.ident()));
        if found.is_none() {
            tracing::debug!(selection = %ctx, config = %config.selector(), "no instance matches selection");
        }
        found
    }

    /// Selected configuration, then selected instance within it.
    ///
    /// # Errors
    ///
    /// [`IdentError::NotFound`] naming whichever lookup came up empty.
    fn resolve(&self, ctx: &SelectionContext) -> Result<(&GraphConfig, &GraphInstance), IdentError> {
        let config = self
            .select_current_configuration(ctx)
            .ok_or_else(|| IdentError::NotFound {
                kind: "configuration",
                selection: ctx.to_string(),
            })?;
        let instance = self
            .select_current_instance(config, ctx)
            .ok_or_else(|| IdentError::NotFound {
                kind: "instance",
                selection: ctx.to_string(),
            })?;
        Ok((config, instance))
    }
}
