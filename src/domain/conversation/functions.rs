//! Functions declared to the model during elicitation.
//!
//! The model may answer a turn by invoking one of two functions instead of
//! replying in text. Both carry the same six-key profile schema; they only
//! differ in what the model meant by calling them. Any other function name
//! is treated as malformed output.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::domain::profile::{Attribute, CandidateProfile, ProfileError, BUDGET_KEY, PROFILE_KEYS};

/// Schema and description of a callable function, in the shape the
/// chat-completions `functions` parameter expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A function invocation exactly as the model returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInvocation {
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

impl FunctionInvocation {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// The two functions offered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileFunction {
    /// "I have enough to match; compare the catalogue against this profile."
    CompareLaptops,
    /// "The profile is complete; here it is."
    GetUserInfo,
}

impl ProfileFunction {
    pub const ALL: [ProfileFunction; 2] = [ProfileFunction::CompareLaptops, ProfileFunction::GetUserInfo];

    pub fn name(self) -> &'static str {
        match self {
            ProfileFunction::CompareLaptops => "compare_laptops_with_user",
            ProfileFunction::GetUserInfo => "get_user_info",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            ProfileFunction::CompareLaptops => {
                "Get the top 3 laptops from the catalogue that best match the user's \
                 'GPU intensity', 'Display quality', 'Portability', 'Multitasking', \
                 'Processing speed' and 'Budget'."
            }
            ProfileFunction::GetUserInfo => {
                "Return the user's laptop requirements once every detail has been gathered."
            }
        }
    }

    pub fn definition(self) -> FunctionDefinition {
        FunctionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: PROFILE_SCHEMA.clone(),
        }
    }
}

static PROFILE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let mut properties = Map::new();
    for attribute in Attribute::ALL {
        properties.insert(
            attribute.key().to_string(),
            json!({
                "type": "string",
                "enum": ["low", "medium", "high"],
                "description": format!(
                    "The user's requirement for {}, classified as 'low', 'medium' or 'high'.",
                    attribute.key().to_lowercase()
                ),
            }),
        );
    }
    properties.insert(
        BUDGET_KEY.to_string(),
        json!({
            "type": "integer",
            "description": "The user's maximum budget for the laptop, as an integer in INR."
        }),
    );
    json!({
        "type": "object",
        "properties": properties,
        "required": PROFILE_KEYS,
    })
});

static DECLARED: Lazy<Vec<FunctionDefinition>> =
    Lazy::new(|| ProfileFunction::ALL.into_iter().map(ProfileFunction::definition).collect());

/// Definitions sent with every elicitation completion.
pub fn declared_functions() -> &'static [FunctionDefinition] {
    &DECLARED
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionCallError {
    #[error("model called undeclared function '{0}'")]
    UnknownFunction(String),

    #[error("arguments to '{function}' are unusable: {source}")]
    InvalidArguments {
        function: &'static str,
        #[source]
        source: ProfileError,
    },
}

/// A resolved function call carrying the candidate profile.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCall {
    MatchRequest(CandidateProfile),
    ProfileHandoff(CandidateProfile),
}

impl FunctionCall {
    pub fn resolve(invocation: &FunctionInvocation) -> Result<Self, FunctionCallError> {
        let function = ProfileFunction::from_name(&invocation.name)
            .ok_or_else(|| FunctionCallError::UnknownFunction(invocation.name.clone()))?;
        let candidate = CandidateProfile::from_arguments(&invocation.arguments).map_err(|source| {
            FunctionCallError::InvalidArguments {
                function: function.name(),
                source,
            }
        })?;

        Ok(match function {
            ProfileFunction::CompareLaptops => FunctionCall::MatchRequest(candidate),
            ProfileFunction::GetUserInfo => FunctionCall::ProfileHandoff(candidate),
        })
    }

    pub fn function(&self) -> ProfileFunction {
        match self {
            FunctionCall::MatchRequest(_) => ProfileFunction::CompareLaptops,
            FunctionCall::ProfileHandoff(_) => ProfileFunction::GetUserInfo,
        }
    }

    pub fn candidate(&self) -> &CandidateProfile {
        match self {
            FunctionCall::MatchRequest(candidate) | FunctionCall::ProfileHandoff(candidate) => candidate,
        }
    }

    pub fn into_candidate(self) -> CandidateProfile {
        match self {
            FunctionCall::MatchRequest(candidate) | FunctionCall::ProfileHandoff(candidate) => candidate,
        }
    }
}
