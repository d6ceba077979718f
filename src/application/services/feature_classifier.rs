//! Feature classifier - grades a free-text laptop description into the
//! five feature levels the scorer consumes.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::catalogue::FeatureProfile;
use crate::domain::conversation::{prompts, Role};
use crate::ports::{AIError, AIProvider, CompletionRequest};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassificationError {
    #[error("classification call failed: {0}")]
    Upstream(#[from] AIError),

    #[error("classifier answer is not a feature profile: {0}")]
    Unparsable(String),
}

pub struct FeatureClassifier {
    provider: Arc<dyn AIProvider>,
    seed: Option<u64>,
}

impl FeatureClassifier {
    /// `provider` is expected to be the retrying provider.
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub async fn classify(&self, description: &str) -> Result<FeatureProfile, ClassificationError> {
        let mut request = CompletionRequest::new("feature_classification")
            .with_message(Role::System, prompts::feature_classifier_prompt())
            .with_message(Role::User, prompts::feature_classifier_input(description));
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }

        let text = self
            .provider
            .complete(request)
            .await?
            .output
            .into_text("feature_classification")?;

        let profile = FeatureProfile::parse(&text).map_err(ClassificationError::Unparsable)?;
        if profile.is_complete() {
            debug!(features = %profile.to_json_string(), "Description classified");
        } else {
            warn!(answer = %text, "Classifier left some features ungraded");
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::profile::{Attribute, Level};

    #[tokio::test]
    async fn parses_classifier_json() {
        let provider = MockAIProvider::new().with_response(
            r#"{"GPU intensity": "high", "Display quality": "high", "Portability": "low",
                "Multitasking": "high", "Processing speed": "high"}"#,
        );
        let classifier = FeatureClassifier::new(Arc::new(provider.clone()));

        let profile = classifier.classify("RTX 4070, 32GB, 2.8 kg").await.unwrap();

        assert_eq!(profile.get(Attribute::GpuIntensity), Some(Level::High));
        assert_eq!(profile.get(Attribute::Portability), Some(Level::Low));
        let sent = &provider.get_calls()[0];
        assert!(sent.messages[1].content.contains("RTX 4070, 32GB, 2.8 kg"));
    }

    #[tokio::test]
    async fn accepts_single_quoted_answer() {
        let provider = MockAIProvider::new().with_response(
            "{'GPU intensity': 'low', 'Display quality': 'medium', 'Portability': 'high', \
             'Multitasking': 'low', 'Processing speed': 'low'}",
        );
        let profile = FeatureClassifier::new(Arc::new(provider))
            .classify("Celeron, 8GB")
            .await
            .unwrap();

        assert!(profile.is_complete());
    }

    #[tokio::test]
    async fn accepts_answer_wrapped_in_code_fence() {
        let provider = MockAIProvider::new().with_response(
            "```json\n{\"GPU intensity\": \"medium\", \"Display quality\": \"high\", \
             \"Portability\": \"medium\", \"Multitasking\": \"high\", \
             \"Processing speed\": \"high\"}\n```",
        );
        let profile = FeatureClassifier::new(Arc::new(provider))
            .classify("Dell Inspiron")
            .await
            .unwrap();

        assert!(profile.is_complete());
        assert_eq!(profile.get(Attribute::DisplayQuality), Some(Level::High));
    }

    #[tokio::test]
    async fn seed_is_sent_when_configured() {
        let provider = MockAIProvider::new().with_response(
            r#"{"GPU intensity": "low", "Display quality": "low", "Portability": "high",
                "Multitasking": "low", "Processing speed": "low"}"#,
        );
        FeatureClassifier::new(Arc::new(provider.clone()))
            .with_seed(2345)
            .classify("Celeron, 4GB")
            .await
            .unwrap();

        assert_eq!(provider.get_calls()[0].seed, Some(2345));
    }

    #[tokio::test]
    async fn prose_answer_is_unparsable() {
        let provider = MockAIProvider::new().with_response("This laptop is great for gaming.");
        let result = FeatureClassifier::new(Arc::new(provider)).classify("x").await;
        assert!(matches!(result, Err(ClassificationError::Unparsable(_))));
    }
}
