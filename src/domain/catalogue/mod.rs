//! Product catalogue and the deterministic matcher over it.

mod error;
mod features;
mod item;
mod scorer;

pub use error::CatalogueError;
pub use features::FeatureProfile;
pub use item::{parse_price, Catalogue, CatalogueItem};
pub use scorer::{
    match_score, score, validate_recommendations, ScoredItem, TOP_MATCHES, VALIDATION_THRESHOLD,
};
