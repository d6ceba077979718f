//! Catalogue items and price normalization.

use serde::Serialize;
use std::collections::BTreeMap;

use super::error::CatalogueError;
use super::features::FeatureProfile;

/// Keys the item and its score already emit when serialized. Detail
/// columns carrying one of these names are stored under a `detail_` prefix.
const RESERVED_KEYS: [&str; 4] = ["name", "price", "features", "score"];

/// A product the advisor can recommend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueItem {
    name: String,
    price: u64,
    features: FeatureProfile,
    /// Remaining catalogue columns, passed through to the recommendation
    /// prompt so the model can quote specifications.
    #[serde(flatten)]
    details: BTreeMap<String, String>,
}

impl CatalogueItem {
    pub fn new(name: impl Into<String>, price: u64, features: FeatureProfile) -> Self {
        Self {
            name: name.into(),
            price,
            features,
            details: BTreeMap::new(),
        }
    }

    /// Builds an item from raw column text, normalizing the price and
    /// parsing the feature column.
    pub fn from_columns(
        row: usize,
        name: &str,
        raw_price: &str,
        raw_features: &str,
    ) -> Result<Self, CatalogueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogueError::MalformedRow {
                row,
                reason: "product name is empty".to_string(),
            });
        }
        let price = parse_price(raw_price).ok_or_else(|| CatalogueError::InvalidPrice {
            row,
            raw: raw_price.to_string(),
        })?;
        let features = FeatureProfile::parse(raw_features)
            .map_err(|reason| CatalogueError::InvalidFeatures { row, reason })?;
        Ok(Self::new(name, price, features))
    }

    pub fn with_detail(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        let column = column.into();
        let key = if RESERVED_KEYS.contains(&column.as_str()) {
            format!("detail_{}", column)
        } else {
            column
        };
        self.details.insert(key, value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn features(&self) -> &FeatureProfile {
        &self.features
    }

    pub fn details(&self) -> &BTreeMap<String, String> {
        &self.details
    }
}

/// Normalizes a stored price such as `"1,04,990"` or `"₹ 35,990.00"`.
///
/// Separators and currency marks are dropped; anything after a decimal
/// point is ignored. Returns `None` unless the result is a positive integer.
pub fn parse_price(raw: &str) -> Option<u64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    if raw[..start].contains('-') {
        return None;
    }
    let whole = raw[start..].split('.').next().unwrap_or_default();
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().ok().filter(|price| *price > 0)
}

/// A loaded catalogue plus the rows that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub items: Vec<CatalogueItem>,
    pub skipped: Vec<CatalogueError>,
}

impl Catalogue {
    pub fn new(items: Vec<CatalogueItem>) -> Self {
        Self {
            items,
            skipped: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::Level;

    mod price {
        use super::*;

        #[test]
        fn strips_thousands_separators() {
            assert_eq!(parse_price("35,990"), Some(35_990));
            assert_eq!(parse_price("1,04,990"), Some(104_990));
        }

        #[test]
        fn strips_currency_marks_and_decimals() {
            assert_eq!(parse_price("₹ 54,990.00"), Some(54_990));
            assert_eq!(parse_price("Rs. 60000"), Some(60_000));
        }

        #[test]
        fn rejects_zero_negative_and_empty() {
            assert_eq!(parse_price("0"), None);
            assert_eq!(parse_price("-45,000"), None);
            assert_eq!(parse_price(""), None);
            assert_eq!(parse_price("call for price"), None);
        }
    }

    mod from_columns {
        use super::*;

        #[test]
        fn builds_item_from_raw_text() {
            let item = CatalogueItem::from_columns(
                1,
                " Vivobook 15 ",
                "42,990",
                r#"{"GPU intensity":"low","Display quality":"medium","Portability":"medium","Multitasking":"low","Processing speed":"medium"}"#,
            )
            .unwrap();

            assert_eq!(item.name(), "Vivobook 15");
            assert_eq!(item.price(), 42_990);
            assert!(item.features().is_complete());
        }

        #[test]
        fn reports_bad_price_with_row_number() {
            let err = CatalogueItem::from_columns(7, "X", "n/a", "{}").unwrap_err();
            assert_eq!(err.row(), Some(7));
            assert!(matches!(err, CatalogueError::InvalidPrice { .. }));
        }

        #[test]
        fn reports_bad_features_with_row_number() {
            let err = CatalogueItem::from_columns(3, "X", "30000", "not json").unwrap_err();
            assert!(matches!(err, CatalogueError::InvalidFeatures { row: 3, .. }));
        }

        #[test]
        fn reports_empty_name() {
            let err = CatalogueItem::from_columns(2, "  ", "30000", "{}").unwrap_err();
            assert!(matches!(err, CatalogueError::MalformedRow { row: 2, .. }));
        }
    }

    #[test]
    fn serializes_details_alongside_core_fields() {
        let item = CatalogueItem::new("ZenBook", 70_000, FeatureProfile::uniform(Level::High))
            .with_detail("Brand", "ASUS");
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["name"], "ZenBook");
        assert_eq!(value["price"], 70_000);
        assert_eq!(value["Brand"], "ASUS");
        assert_eq!(value["features"]["Portability"], "high");
    }

    #[test]
    fn detail_named_like_a_core_field_does_not_duplicate_the_key() {
        let item = CatalogueItem::new("ZenBook", 70_000, FeatureProfile::uniform(Level::High))
            .with_detail("name", "ZenBook 14 OLED")
            .with_detail("score", "4.5 stars");
        let json = serde_json::to_string(&item).unwrap();

        assert_eq!(json.matches("\"name\":").count(), 1);
        assert!(!json.contains("\"score\":"));
        assert_eq!(item.details().get("detail_name").map(String::as_str), Some("ZenBook 14 OLED"));
        assert_eq!(item.details().get("detail_score").map(String::as_str), Some("4.5 stars"));
    }
}
