//! Error types for the catalog-lens crate.
//!
//! There is no "not found" variant: lookups return `Option` and each surface
//! renders absence its own way.

use thiserror::Error;

/// Errors returned by catalog operations and their outer surfaces.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Inbound payload failed validation. Carries every violated rule.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl CatalogError {
    /// Shorthand for a single-message validation failure.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }
}
