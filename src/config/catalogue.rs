//! Catalogue file configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the catalogue files live and how their columns are named
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueConfig {
    /// Scored catalogue read by the advisor
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Raw catalogue with descriptions, read by regeneration
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    #[serde(default = "default_name_column")]
    pub name_column: String,

    #[serde(default = "default_brand_column")]
    pub brand_column: String,

    #[serde(default = "default_price_column")]
    pub price_column: String,

    #[serde(default = "default_description_column")]
    pub description_column: String,

    #[serde(default = "default_feature_column")]
    pub feature_column: String,

    /// Fail the whole load on the first unparsable row
    #[serde(default)]
    pub strict: bool,
}

impl CatalogueConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let columns = [
            ("name_column", &self.name_column),
            ("brand_column", &self.brand_column),
            ("price_column", &self.price_column),
            ("description_column", &self.description_column),
            ("feature_column", &self.feature_column),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyColumnName(key));
            }
        }
        Ok(())
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            source_path: default_source_path(),
            name_column: default_name_column(),
            brand_column: default_brand_column(),
            price_column: default_price_column(),
            description_column: default_description_column(),
            feature_column: default_feature_column(),
            strict: false,
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("updated_laptop.csv")
}

fn default_source_path() -> PathBuf {
    PathBuf::from("laptop_data.csv")
}

fn default_name_column() -> String {
    "Model Name".to_string()
}

fn default_brand_column() -> String {
    "Brand".to_string()
}

fn default_price_column() -> String {
    "Price".to_string()
}

fn default_description_column() -> String {
    "Description".to_string()
}

fn default_feature_column() -> String {
    "laptop_feature".to_string()
}
