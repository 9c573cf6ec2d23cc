//! Trait and types for ZIP boundary lookups.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// A ZIP code's boundary. `geometry` is opaque GeoJSON handed to the renderer as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZipBoundary {
    pub zip: String,
    pub geometry: Value,
}

/// Abstraction over a boundary provider.
#[async_trait::async_trait]
pub trait BoundaryApi {
    /// Returns every ZIP boundary in `state` (e.g. `"TX"`).
    async fn zip_boundaries(&self, state: &str) -> Result<Vec<ZipBoundary>>;
}
