//! Attribute levels and the attribute vocabulary shared with the catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Key under which the budget travels in function arguments and JSON.
pub const BUDGET_KEY: &str = "Budget";

/// The six keys of a requirement profile, in declaration order.
pub const PROFILE_KEYS: [&str; 6] = [
    "GPU intensity",
    "Display quality",
    "Portability",
    "Multitasking",
    "Processing speed",
    BUDGET_KEY,
];

/// Rank given to a missing or unrecognised level.
pub const UNKNOWN_RANK: i8 = -1;

/// Ordinal grade of a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Low, Level::Medium, Level::High];

    /// low=0 < medium=1 < high=2.
    pub fn rank(self) -> i8 {
        match self {
            Level::Low => 0,
            Level::Medium => 1,
            Level::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

/// Rank of an optional level; absent levels rank below `Low`.
pub fn rank_of(level: Option<Level>) -> i8 {
    level.map_or(UNKNOWN_RANK, Level::rank)
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            other => Err(ValidationError::invalid_format(
                "level",
                format!("expected low, medium or high, got '{}'", other),
            )),
        }
    }
}

/// One of the five graded laptop attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    GpuIntensity,
    DisplayQuality,
    Portability,
    Multitasking,
    ProcessingSpeed,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::GpuIntensity,
        Attribute::DisplayQuality,
        Attribute::Portability,
        Attribute::Multitasking,
        Attribute::ProcessingSpeed,
    ];

    /// Human-readable key used in prompts, function schemas and stored JSON.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::GpuIntensity => "GPU intensity",
            Attribute::DisplayQuality => "Display quality",
            Attribute::Portability => "Portability",
            Attribute::Multitasking => "Multitasking",
            Attribute::ProcessingSpeed => "Processing speed",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key.trim())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
