//! Catalogue regeneration - grades every description in the raw catalogue
//! and publishes the scored catalogue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::services::{ClassificationError, FeatureClassifier};
use crate::domain::catalogue::CatalogueError;
use crate::ports::{CatalogueSource, RawCatalogue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegenerationError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("row {row}: {source}")]
    Classification {
        row: usize,
        #[source]
        source: ClassificationError,
    },
}

/// Rows processed out of rows total. Shared with status readers.
#[derive(Debug, Clone, Default)]
pub struct RegenerationProgress {
    processed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl RegenerationProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Whole percent complete; 0 before the total is known.
    pub fn percent(&self) -> u8 {
        match self.total() {
            0 => 0,
            total => ((self.processed().min(total) * 100) / total) as u8,
        }
    }

    fn start(&self, total: usize) {
        self.processed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn advance(&self) {
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn clear(&self) {
        self.start(0);
    }
}

pub struct CatalogueRegenerator {
    source: Arc<dyn CatalogueSource>,
    classifier: FeatureClassifier,
    description_column: String,
    feature_column: String,
}

impl CatalogueRegenerator {
    pub fn new(
        source: Arc<dyn CatalogueSource>,
        classifier: FeatureClassifier,
        description_column: impl Into<String>,
        feature_column: impl Into<String>,
    ) -> Self {
        Self {
            source,
            classifier,
            description_column: description_column.into(),
            feature_column: feature_column.into(),
        }
    }

    /// Classifies every row and publishes the result. Nothing is published
    /// unless every row was classified. Returns the number of rows written.
    pub async fn regenerate(&self, progress: &RegenerationProgress) -> Result<usize, RegenerationError> {
        let raw = self.source.load_raw().await?;
        let description_idx = raw.column(&self.description_column)?;
        progress.start(raw.len());
        info!(rows = raw.len(), "Regenerating catalogue features");

        let mut features = Vec::with_capacity(raw.len());
        for (idx, row) in raw.rows.iter().enumerate() {
            let description = row.get(description_idx).map(String::as_str).unwrap_or_default();
            let profile = self
                .classifier
                .classify(description)
                .await
                .map_err(|source| RegenerationError::Classification { row: idx + 1, source })?;
            features.push(profile.to_json_string());
            progress.advance();
            debug!(row = idx + 1, "Row classified");
        }

        let scored = self.with_feature_column(raw, features);
        let rows = scored.len();
        self.source.publish(scored).await?;
        info!(rows, "Catalogue regeneration complete");
        Ok(rows)
    }

    /// Adds the feature column, replacing an existing one of the same name.
    fn with_feature_column(&self, mut raw: RawCatalogue, features: Vec<String>) -> RawCatalogue {
        match raw.column(&self.feature_column) {
            Ok(idx) => {
                for (row, value) in raw.rows.iter_mut().zip(features) {
                    if row.len() <= idx {
                        row.resize(idx + 1, String::new());
                    }
                    row[idx] = value;
                }
            }
            Err(_) => {
                raw.headers.push(self.feature_column.clone());
                let width = raw.headers.len() - 1;
                for (row, value) in raw.rows.iter_mut().zip(features) {
                    row.resize(width, String::new());
                    row.push(value);
                }
            }
        }
        raw
    }
}
