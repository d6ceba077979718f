//! The confirmed requirement profile.

use serde::{Deserialize, Serialize};

use super::level::{Attribute, Level};

/// Smallest budget (INR) the advisor accepts as meaningful.
pub const DEFAULT_MIN_BUDGET: u64 = 25_000;

/// A complete, confirmed set of user requirements.
///
/// Field names serialize to the same keys the model uses in its
/// function arguments, so the profile can be echoed back into transcripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProfile {
    #[serde(rename = "GPU intensity")]
    gpu_intensity: Level,
    #[serde(rename = "Display quality")]
    display_quality: Level,
    #[serde(rename = "Portability")]
    portability: Level,
    #[serde(rename = "Multitasking")]
    multitasking: Level,
    #[serde(rename = "Processing speed")]
    processing_speed: Level,
    #[serde(rename = "Budget")]
    budget: u64,
}

impl RequirementProfile {
    /// Profile with every attribute at `level`.
    pub fn uniform(level: Level, budget: u64) -> Self {
        Self {
            gpu_intensity: level,
            display_quality: level,
            portability: level,
            multitasking: level,
            processing_speed: level,
            budget,
        }
    }

    /// Returns a copy with one attribute replaced.
    pub fn with_level(mut self, attribute: Attribute, level: Level) -> Self {
        *self.slot(attribute) = level;
        self
    }

    pub fn level(&self, attribute: Attribute) -> Level {
        match attribute {
            Attribute::GpuIntensity => self.gpu_intensity,
            Attribute::DisplayQuality => self.display_quality,
            Attribute::Portability => self.portability,
            Attribute::Multitasking => self.multitasking,
            Attribute::ProcessingSpeed => self.processing_speed,
        }
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// JSON text with the six human-readable keys.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn slot(&mut self, attribute: Attribute) -> &mut Level {
        match attribute {
            Attribute::GpuIntensity => &mut self.gpu_intensity,
            Attribute::DisplayQuality => &mut self.display_quality,
            Attribute::Portability => &mut self.portability,
            Attribute::Multitasking => &mut self.multitasking,
            Attribute::ProcessingSpeed => &mut self.processing_speed,
        }
    }
}
