//! Catalogue Ports - reading scored catalogues and regenerating them.

use async_trait::async_trait;

use crate::domain::catalogue::{Catalogue, CatalogueError};

/// Loads the scored catalogue (items with feature profiles).
///
/// Implementations read fresh data on every call so a regenerated
/// catalogue is picked up without a restart.
#[async_trait]
pub trait CatalogueReader: Send + Sync {
    async fn load(&self) -> Result<Catalogue, CatalogueError>;
}

/// Raw tabular catalogue: a header row and string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCatalogue {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawCatalogue {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of `name` in the header row.
    pub fn column(&self, name: &str) -> Result<usize, CatalogueError> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| CatalogueError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Source of descriptions for feature regeneration, and the sink for the
/// regenerated catalogue.
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Reads the catalogue that carries free-text descriptions.
    async fn load_raw(&self) -> Result<RawCatalogue, CatalogueError>;

    /// Replaces the scored catalogue. Readers must never observe a
    /// partially written file.
    async fn publish(&self, catalogue: RawCatalogue) -> Result<(), CatalogueError>;
}
