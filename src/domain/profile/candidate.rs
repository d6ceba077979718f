//! Candidate profiles extracted from model function calls.

use serde_json::{Map, Value};
use thiserror::Error;

use super::level::{Attribute, Level, BUDGET_KEY, PROFILE_KEYS};
use super::requirement::RequirementProfile;
use crate::domain::foundation::ValidationError;

/// Errors raised while reading or promoting a candidate profile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("function arguments are not valid JSON: {0}")]
    ArgumentsNotJson(String),

    #[error("function arguments must be a JSON object")]
    ArgumentsNotObject,

    #[error("Budget cannot be read as an integer: {0}")]
    InvalidBudget(String),

    #[error("profile is not complete: {0}")]
    Incomplete(#[from] ValidationError),
}

/// A partially trusted profile as the model reported it.
///
/// Only the six schema keys are kept. `Budget` is coerced to an integer
/// on the way in; level values are kept verbatim so confirmation can
/// judge them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateProfile {
    fields: Map<String, Value>,
}

impl CandidateProfile {
    /// Parses the raw `arguments` string of a function invocation.
    pub fn from_arguments(raw: &str) -> Result<Self, ProfileError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ProfileError::ArgumentsNotJson(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ProfileError> {
        let Value::Object(object) = value else {
            return Err(ProfileError::ArgumentsNotObject);
        };

        let mut fields = Map::new();
        for key in PROFILE_KEYS {
            let Some(value) = object.get(key) else {
                continue;
            };
            let value = if key == BUDGET_KEY {
                Value::from(coerce_budget(value)?)
            } else {
                value.clone()
            };
            fields.insert(key.to_string(), value);
        }
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn budget(&self) -> Option<i64> {
        self.fields.get(BUDGET_KEY).and_then(Value::as_i64)
    }

    /// Schema keys the model has not provided yet.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        PROFILE_KEYS
            .into_iter()
            .filter(|key| !self.fields.contains_key(*key))
            .collect()
    }

    /// Structural check: every key present, levels in range, budget at
    /// least `min_budget`. Returns the first problem found.
    pub fn check(&self, min_budget: u64) -> Result<(), ValidationError> {
        if let Some(key) = self.missing_keys().first() {
            return Err(ValidationError::empty_field(*key));
        }
        for attribute in Attribute::ALL {
            self.level(attribute)?;
        }
        let budget = self.budget().unwrap_or_default();
        let min = i64::try_from(min_budget).unwrap_or(i64::MAX);
        if budget < min {
            return Err(ValidationError::below_minimum(BUDGET_KEY, min, budget));
        }
        Ok(())
    }

    /// Promotes the candidate into a confirmed profile.
    pub fn into_requirement_profile(self, min_budget: u64) -> Result<RequirementProfile, ProfileError> {
        self.check(min_budget)?;

        let budget = self.budget().unwrap_or_default().max(0) as u64;
        let mut profile = RequirementProfile::uniform(Level::Low, budget);
        for attribute in Attribute::ALL {
            profile = profile.with_level(attribute, self.level(attribute)?);
        }
        Ok(profile)
    }

    /// Compact JSON of the retained keys, used when narrating the
    /// candidate back into a transcript.
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    fn level(&self, attribute: Attribute) -> Result<Level, ValidationError> {
        let raw = self
            .fields
            .get(attribute.key())
            .ok_or_else(|| ValidationError::empty_field(attribute.key()))?;
        raw.as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    attribute.key(),
                    format!("expected low, medium or high, got {}", raw),
                )
            })
    }
}

fn coerce_budget(value: &Value) -> Result<i64, ProfileError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| ProfileError::InvalidBudget(n.to_string())),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, ',' | '_' | ' '))
                .collect();
            cleaned
                .parse::<i64>()
                .map_err(|_| ProfileError::InvalidBudget(s.clone()))
        }
        other => Err(ProfileError::InvalidBudget(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_args() -> Value {
        json!({
            "GPU intensity": "high",
            "Display quality": "medium",
            "Portability": "low",
            "Multitasking": "high",
            "Processing speed": "medium",
            "Budget": 80000
        })
    }

    mod parsing {
        use super::*;

        #[test]
        fn keeps_only_schema_keys() {
            let mut args = complete_args();
            args["Battery"] = json!("long");
            let candidate = CandidateProfile::from_value(args).unwrap();

            assert!(candidate.get("Battery").is_none());
            assert!(candidate.missing_keys().is_empty());
        }

        #[test]
        fn coerces_string_budget_with_separators() {
            let candidate =
                CandidateProfile::from_value(json!({"Budget": "1,50,000"})).unwrap();
            assert_eq!(candidate.budget(), Some(150_000));
        }

        #[test]
        fn truncates_fractional_budget() {
            let candidate = CandidateProfile::from_value(json!({"Budget": 49999.9})).unwrap();
            assert_eq!(candidate.budget(), Some(49_999));
        }

        #[test]
        fn rejects_non_numeric_budget() {
            let result = CandidateProfile::from_value(json!({"Budget": "around fifty"}));
            assert!(matches!(result, Err(ProfileError::InvalidBudget(_))));
        }

        #[test]
        fn rejects_non_object_arguments() {
            assert_eq!(
                CandidateProfile::from_arguments("[1,2]"),
                Err(ProfileError::ArgumentsNotObject)
            );
        }

        #[test]
        fn rejects_invalid_json() {
            assert!(matches!(
                CandidateProfile::from_arguments("{not json"),
                Err(ProfileError::ArgumentsNotJson(_))
            ));
        }
    }

    mod checking {
        use super::*;

        #[test]
        fn complete_profile_passes() {
            let candidate = CandidateProfile::from_value(complete_args()).unwrap();
            assert!(candidate.check(25_000).is_ok());
        }

        #[test]
        fn missing_budget_is_reported() {
            let mut args = complete_args();
            args.as_object_mut().unwrap().remove("Budget");
            let candidate = CandidateProfile::from_value(args).unwrap();

            assert_eq!(candidate.missing_keys(), vec!["Budget"]);
            assert_eq!(candidate.check(25_000).unwrap_err().field(), "Budget");
        }

        #[test]
        fn level_outside_set_is_reported() {
            let mut args = complete_args();
            args["Portability"] = json!("extreme");
            let candidate = CandidateProfile::from_value(args).unwrap();

            assert_eq!(candidate.check(25_000).unwrap_err().field(), "Portability");
        }

        #[test]
        fn budget_below_minimum_is_reported() {
            let mut args = complete_args();
            args["Budget"] = json!(20000);
            let candidate = CandidateProfile::from_value(args).unwrap();

            assert_eq!(
                candidate.check(25_000),
                Err(ValidationError::below_minimum("Budget", 25_000, 20_000))
            );
        }

        #[test]
        fn budget_at_minimum_is_accepted() {
            let mut args = complete_args();
            args["Budget"] = json!(25000);
            let candidate = CandidateProfile::from_value(args).unwrap();
            assert!(candidate.check(25_000).is_ok());
        }
    }

    mod promotion {
        use super::*;

        #[test]
        fn promotes_complete_candidate() {
            let profile = CandidateProfile::from_value(complete_args())
                .unwrap()
                .into_requirement_profile(25_000)
                .unwrap();

            assert_eq!(profile.level(Attribute::GpuIntensity), Level::High);
            assert_eq!(profile.level(Attribute::Portability), Level::Low);
            assert_eq!(profile.budget(), 80_000);
        }

        #[test]
        fn accepts_capitalised_levels() {
            let mut args = complete_args();
            args["Display quality"] = json!("High");
            let profile = CandidateProfile::from_value(args)
                .unwrap()
                .into_requirement_profile(25_000)
                .unwrap();
            assert_eq!(profile.level(Attribute::DisplayQuality), Level::High);
        }

        #[test]
        fn refuses_incomplete_candidate() {
            let candidate = CandidateProfile::from_value(json!({"Budget": 60000})).unwrap();
            assert!(matches!(
                candidate.into_requirement_profile(25_000),
                Err(ProfileError::Incomplete(_))
            ));
        }
    }
}
