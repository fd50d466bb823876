//! Catalog Lens: an item catalog with best-effort AI augmentation.
//!
//! The library is shared by the HTTP server and the MCP stdio server.

pub mod augment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod server;
pub mod service;
pub mod validation;

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::service::CatalogService;

/// Service name reported by `/api` and the MCP handshake.
pub const SERVICE_NAME: &str = "Catalog Lens";

/// Build an empty catalog service wired to the configured provider.
pub fn build_service(config: &Config) -> CatalogService {
    CatalogService::new(CatalogStore::new(), config.gateway())
}
