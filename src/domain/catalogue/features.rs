//! Feature profiles attached to catalogue items.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::foundation::strip_code_fence;
use crate::domain::profile::{Attribute, Level};

/// Per-attribute levels of a catalogue item.
///
/// Attributes the classifier could not grade are simply absent and rank
/// below `low` when scored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureProfile {
    levels: BTreeMap<Attribute, Level>,
}

impl FeatureProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(level: Level) -> Self {
        Attribute::ALL
            .into_iter()
            .fold(Self::new(), |profile, attribute| profile.with(attribute, level))
    }

    pub fn with(mut self, attribute: Attribute, level: Level) -> Self {
        self.levels.insert(attribute, level);
        self
    }

    pub fn get(&self, attribute: Attribute) -> Option<Level> {
        self.levels.get(&attribute).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.levels.len() == Attribute::ALL.len()
    }

    /// Parses the persisted feature column.
    ///
    /// The column is JSON. Files written by older tooling used single
    /// quotes; those are accepted as a fallback. A markdown code fence
    /// around the object, as the classifier sometimes answers, is removed.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = strip_code_fence(raw);
        if raw.is_empty() {
            return Err("feature column is empty".to_string());
        }
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(err) if raw.contains('\'') => serde_json::from_str::<Value>(&raw.replace('\'', "\""))
                .map_err(|_| err.to_string())?,
            Err(err) => return Err(err.to_string()),
        };
        Self::from_json(&value)
    }

    /// Reads the five attribute keys from a JSON object. Unknown keys are
    /// ignored and ungradable values are left absent.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| format!("expected a JSON object, got {}", value))?;

        let mut profile = Self::new();
        for (key, value) in object {
            let Some(attribute) = Attribute::from_key(key) else {
                continue;
            };
            if let Some(level) = value.as_str().and_then(|s| s.parse::<Level>().ok()) {
                profile = profile.with(attribute, level);
            }
        }
        Ok(profile)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for FeatureProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.levels.len()))?;
        for (attribute, level) in &self.levels {
            map.serialize_entry(attribute.key(), level)?;
        }
        map.end()
    }
}
