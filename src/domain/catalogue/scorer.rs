//! Deterministic matching of catalogue items against a requirement profile.

use serde::Serialize;

use super::item::CatalogueItem;
use super::features::FeatureProfile;
use crate::domain::profile::{rank_of, Attribute, RequirementProfile};

/// How many ranked items a scoring pass returns.
pub const TOP_MATCHES: usize = 3;

/// Items must score strictly above this to be recommended.
pub const VALIDATION_THRESHOLD: u8 = 2;

/// A catalogue item annotated with its match score (0..=5).
///
/// Scores are only comparable within the pass that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    item: CatalogueItem,
    score: u8,
}

impl ScoredItem {
    pub fn item(&self) -> &CatalogueItem {
        &self.item
    }

    pub fn score(&self) -> u8 {
        self.score
    }
}

/// Number of attributes where the item's level meets or beats the
/// profile's requirement.
pub fn match_score(profile: &RequirementProfile, features: &FeatureProfile) -> u8 {
    Attribute::ALL
        .into_iter()
        .filter(|attribute| {
            rank_of(features.get(*attribute)) >= profile.level(*attribute).rank()
        })
        .count() as u8
}

/// Filters the catalogue to the budget, scores what remains and returns
/// the best [`TOP_MATCHES`], ties kept in catalogue order.
pub fn score(profile: &RequirementProfile, catalogue: &[CatalogueItem]) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = catalogue
        .iter()
        .filter(|item| item.price() <= profile.budget())
        .map(|item| ScoredItem {
            score: match_score(profile, item.features()),
            item: item.clone(),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(TOP_MATCHES);
    scored
}

/// Keeps only matches good enough to recommend. May return nothing even
/// when `scored` is non-empty.
pub fn validate_recommendations(scored: Vec<ScoredItem>) -> Vec<ScoredItem> {
    scored
        .into_iter()
        .filter(|candidate| candidate.score > VALIDATION_THRESHOLD)
        .collect()
}
