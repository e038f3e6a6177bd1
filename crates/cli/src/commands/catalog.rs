//! Catalog file loading.
//!
//! A catalog is the full product list exported from the CMS. Files ending in
//! `.yaml` or `.yml` are read as YAML; everything else as JSON.

use std::path::Path;

use loomwise_core::Product;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Load a catalog from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse as a list
/// of products.
pub fn load(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let catalog = parse(&content, is_yaml(path))?;
    info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
    Ok(catalog)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

fn parse(content: &str, yaml: bool) -> Result<Vec<Product>, CatalogError> {
    if yaml {
        Ok(serde_yaml::from_str(content)?)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}
