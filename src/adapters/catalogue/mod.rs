//! Catalogue adapters - CSV files on local disk.

mod csv_catalogue;

pub use csv_catalogue::{CatalogueColumns, CsvCatalogue};
