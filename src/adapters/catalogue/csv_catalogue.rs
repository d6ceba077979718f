//! CSV-backed catalogue.
//!
//! Two files are involved: the raw catalogue with free-text descriptions
//! (`source_path`) and the scored catalogue that additionally carries the
//! feature column (`path`). Regeneration reads the former and publishes
//! the latter.
//!
//! Publishing writes a sibling temp file and renames it over the target,
//! so a concurrent `load` sees either the old file or the new one.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::catalogue::{Catalogue, CatalogueError, CatalogueItem};
use crate::ports::{CatalogueReader, CatalogueSource, RawCatalogue};

/// Column names used to interpret catalogue rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueColumns {
    pub name: String,
    /// Kept as a detail column; used when listing items.
    pub brand: String,
    pub price: String,
    pub description: String,
    pub features: String,
}

impl Default for CatalogueColumns {
    fn default() -> Self {
        Self {
            name: "Model Name".to_string(),
            brand: "Brand".to_string(),
            price: "Price".to_string(),
            description: "Description".to_string(),
            features: "laptop_feature".to_string(),
        }
    }
}

/// Catalogue stored as CSV files.
#[derive(Debug, Clone)]
pub struct CsvCatalogue {
    path: PathBuf,
    source_path: PathBuf,
    columns: CatalogueColumns,
    strict: bool,
}

impl CsvCatalogue {
    pub fn new(path: impl Into<PathBuf>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source_path: source_path.into(),
            columns: CatalogueColumns::default(),
            strict: false,
        }
    }

    pub fn with_columns(mut self, columns: CatalogueColumns) -> Self {
        self.columns = columns;
        self
    }

    /// In strict mode the first bad row fails the whole load.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn columns(&self) -> &CatalogueColumns {
        &self.columns
    }

    /// Synchronous load of the scored catalogue.
    pub fn load_blocking(&self) -> Result<Catalogue, CatalogueError> {
        let raw = read_csv(&self.path)?;
        self.interpret(raw)
    }

    fn interpret(&self, raw: RawCatalogue) -> Result<Catalogue, CatalogueError> {
        let name_idx = raw.column(&self.columns.name)?;
        let price_idx = raw.column(&self.columns.price)?;
        let feature_idx = raw.column(&self.columns.features)?;

        let mut catalogue = Catalogue::default();
        for (idx, cells) in raw.rows.iter().enumerate() {
            let row = idx + 1;
            let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or_default();

            let parsed = CatalogueItem::from_columns(row, cell(name_idx), cell(price_idx), cell(feature_idx))
                .map(|item| {
                    raw.headers
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| ![name_idx, price_idx, feature_idx].contains(i))
                        .fold(item, |item, (i, header)| item.with_detail(header.trim(), cell(i)))
                });

            match parsed {
                Ok(item) => catalogue.items.push(item),
                Err(err) if self.strict => return Err(err),
                Err(err) => {
                    warn!(row, error = %err, "Skipping catalogue row");
                    catalogue.skipped.push(err);
                }
            }
        }

        debug!(
            path = %self.path.display(),
            items = catalogue.items.len(),
            skipped = catalogue.skipped.len(),
            "Catalogue loaded"
        );
        Ok(catalogue)
    }

    fn publish_blocking(&self, catalogue: &RawCatalogue) -> Result<(), CatalogueError> {
        let staging = staging_path(&self.path);
        write_csv(&staging, catalogue)?;
        fs::rename(&staging, &self.path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            CatalogueError::Write(format!("{}: {}", self.path.display(), e))
        })?;
        info!(path = %self.path.display(), rows = catalogue.len(), "Catalogue published");
        Ok(())
    }
}

#[async_trait]
impl CatalogueReader for CsvCatalogue {
    async fn load(&self) -> Result<Catalogue, CatalogueError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.load_blocking())
            .await
            .map_err(|e| CatalogueError::Read(format!("catalogue load task failed: {}", e)))?
    }
}

#[async_trait]
impl CatalogueSource for CsvCatalogue {
    async fn load_raw(&self) -> Result<RawCatalogue, CatalogueError> {
        let path = self.source_path.clone();
        tokio::task::spawn_blocking(move || read_csv(&path))
            .await
            .map_err(|e| CatalogueError::Read(format!("catalogue read task failed: {}", e)))?
    }

    async fn publish(&self, catalogue: RawCatalogue) -> Result<(), CatalogueError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.publish_blocking(&catalogue))
            .await
            .map_err(|e| CatalogueError::Write(format!("catalogue publish task failed: {}", e)))?
    }
}

/// `dir/.name.tmp` next to the target, so the rename stays on one filesystem.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalogue.csv".to_string());
    target.with_file_name(format!(".{}.tmp", name))
}

fn read_csv(path: &Path) -> Result<RawCatalogue, CatalogueError> {
    let read_err = |e: csv::Error| CatalogueError::Read(format!("{}: {}", path.display(), e));

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawCatalogue::new(headers, rows))
}

fn write_csv(path: &Path, catalogue: &RawCatalogue) -> Result<(), CatalogueError> {
    let write_err = |e: csv::Error| CatalogueError::Write(format!("{}: {}", path.display(), e));

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(&catalogue.headers).map_err(write_err)?;
    for row in &catalogue.rows {
        writer.write_record(row).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| CatalogueError::Write(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue::FeatureProfile;
    use crate::domain::profile::{Attribute, Level};
    use tempfile::TempDir;

    const HEADER: &str = "Brand,Model Name,Price,Description,laptop_feature\n";

    fn all_high() -> String {
        FeatureProfile::uniform(Level::High).to_json_string()
    }

    fn csv_cell(raw: &str) -> String {
        format!("\"{}\"", raw.replace('"', "\"\""))
    }

    fn write_catalogue(dir: &TempDir, body: &str) -> CsvCatalogue {
        let path = dir.path().join("updated_laptop.csv");
        fs::write(&path, format!("{}{}", HEADER, body)).unwrap();
        CsvCatalogue::new(path, dir.path().join("laptop_data.csv"))
    }

    // ───────────────────────────────────────────────────────────────
    // Loading
    // ───────────────────────────────────────────────────────────────

    mod loading {
        use super::*;

        #[tokio::test]
        async fn loads_items_with_prices_features_and_details() {
            let dir = TempDir::new().unwrap();
            let body = format!(
                "Dell,Inspiron,\"35,990\",Intel i5 16GB,{}\n",
                csv_cell(&all_high())
            );
            let catalogue = write_catalogue(&dir, &body).load().await.unwrap();

            assert_eq!(catalogue.items.len(), 1);
            let item = &catalogue.items[0];
            assert_eq!(item.name(), "Inspiron");
            assert_eq!(item.price(), 35_990);
            assert_eq!(item.features().get(Attribute::Portability), Some(Level::High));
            assert_eq!(item.details().get("Brand").map(String::as_str), Some("Dell"));
            assert!(!item.details().contains_key("laptop_feature"));
        }

        #[tokio::test]
        async fn accepts_legacy_single_quoted_features() {
            let dir = TempDir::new().unwrap();
            let legacy = "{'GPU intensity': 'low', 'Display quality': 'medium', \
                          'Portability': 'high', 'Multitasking': 'low', 'Processing speed': 'medium'}";
            let body = format!("HP,Pavilion,\"45,000\",desc,{}\n", csv_cell(legacy));
            let catalogue = write_catalogue(&dir, &body).load().await.unwrap();

            assert_eq!(catalogue.items.len(), 1);
            assert_eq!(
                catalogue.items[0].features().get(Attribute::DisplayQuality),
                Some(Level::Medium)
            );
        }

        #[tokio::test]
        async fn skips_bad_rows_and_reports_them() {
            let dir = TempDir::new().unwrap();
            let body = format!(
                "Dell,Good,\"30,000\",d,{f}\nAcer,NoPrice,n/a,d,{f}\nAsus,NoFeatures,\"40,000\",d,not a profile\n",
                f = csv_cell(&all_high())
            );
            let catalogue = write_catalogue(&dir, &body).load().await.unwrap();

            assert_eq!(catalogue.items.len(), 1);
            assert_eq!(catalogue.skipped.len(), 2);
            assert_eq!(catalogue.skipped[0].row(), Some(2));
            assert_eq!(catalogue.skipped[1].row(), Some(3));
        }

        #[tokio::test]
        async fn columns_named_like_item_fields_are_prefixed() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("updated_laptop.csv");
            fs::write(
                &path,
                format!(
                    "Model Name,Price,score,laptop_feature\nInspiron,\"35,990\",4.2,{}\n",
                    csv_cell(&all_high())
                ),
            )
            .unwrap();

            let catalogue = CsvCatalogue::new(path, dir.path().join("laptop_data.csv"))
                .load()
                .await
                .unwrap();

            let item = &catalogue.items[0];
            assert_eq!(item.details().get("detail_score").map(String::as_str), Some("4.2"));
            assert!(!item.details().contains_key("score"));
        }

        #[tokio::test]
        async fn strict_mode_fails_on_first_bad_row() {
            let dir = TempDir::new().unwrap();
            let body = format!("Acer,NoPrice,n/a,d,{}\n", csv_cell(&all_high()));
            let result = write_catalogue(&dir, &body).with_strict(true).load().await;

            assert!(matches!(
                result,
                Err(CatalogueError::InvalidPrice { row: 1, .. })
            ));
        }

        #[tokio::test]
        async fn missing_feature_column_is_an_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("plain.csv");
            fs::write(&path, "Model Name,Price\nX,\"1,000\"\n").unwrap();

            let result = CsvCatalogue::new(&path, &path).load().await;
            assert_eq!(
                result.unwrap_err(),
                CatalogueError::MissingColumn("laptop_feature".into())
            );
        }

        #[tokio::test]
        async fn missing_file_is_a_read_error() {
            let dir = TempDir::new().unwrap();
            let catalogue = CsvCatalogue::new(dir.path().join("absent.csv"), dir.path().join("x.csv"));
            assert!(matches!(catalogue.load().await, Err(CatalogueError::Read(_))));
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Raw source and publishing
    // ───────────────────────────────────────────────────────────────

    mod publishing {
        use super::*;

        #[tokio::test]
        async fn load_raw_reads_source_file() {
            let dir = TempDir::new().unwrap();
            let source = dir.path().join("laptop_data.csv");
            fs::write(&source, "Model Name,Price,Description\nX,\"1,000\",\"8GB, i3\"\n").unwrap();

            let raw = CsvCatalogue::new(dir.path().join("out.csv"), &source)
                .load_raw()
                .await
                .unwrap();

            assert_eq!(raw.headers, vec!["Model Name", "Price", "Description"]);
            assert_eq!(raw.rows, vec![vec!["X", "1,000", "8GB, i3"]]);
        }

        #[tokio::test]
        async fn published_catalogue_is_loadable_and_leaves_no_staging_file() {
            let dir = TempDir::new().unwrap();
            let target = dir.path().join("updated_laptop.csv");
            let catalogue = CsvCatalogue::new(&target, dir.path().join("laptop_data.csv"));

            let raw = RawCatalogue::new(
                vec!["Model Name".into(), "Price".into(), "laptop_feature".into()],
                vec![vec!["Zen".into(), "55,000".into(), all_high()]],
            );
            catalogue.publish(raw).await.unwrap();

            let loaded = catalogue.load().await.unwrap();
            assert_eq!(loaded.items.len(), 1);
            assert_eq!(loaded.items[0].price(), 55_000);
            assert!(!staging_path(&target).exists());
        }

        #[tokio::test]
        async fn publish_replaces_existing_file() {
            let dir = TempDir::new().unwrap();
            let catalogue = write_catalogue(&dir, "");
            let raw = RawCatalogue::new(
                vec!["Model Name".into(), "Price".into(), "laptop_feature".into()],
                vec![
                    vec!["A".into(), "30000".into(), all_high()],
                    vec!["B".into(), "40000".into(), all_high()],
                ],
            );
            catalogue.publish(raw).await.unwrap();

            assert_eq!(catalogue.load().await.unwrap().items.len(), 2);
        }

        #[test]
        fn staging_file_sits_next_to_target() {
            let staging = staging_path(Path::new("/data/updated_laptop.csv"));
            assert_eq!(staging, PathBuf::from("/data/.updated_laptop.csv.tmp"));
        }
    }
}
