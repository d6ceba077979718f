//! Dialogue Orchestrator - drives one conversation through
//! Eliciting → Confirming → Recommending → Discussing.
//!
//! The orchestrator holds no conversation state of its own. Every call
//! receives the session's [`ConversationContext`] and mutates it in place,
//! so one orchestrator serves any number of sessions.
//!
//! Moderation runs on every user message before anything else and on
//! every assistant reply before it is recorded. A flag anywhere restarts
//! the conversation.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::outcome::{TurnError, TurnOutcome};
use crate::application::services::{ModerationGate, ProfileConfirmer};
use crate::domain::catalogue::{score, validate_recommendations, ScoredItem};
use crate::domain::conversation::{
    declared_functions, prompts, ConversationContext, ConversationPhase, FunctionCall,
    Transcript, TurnContent,
};
use crate::domain::foundation::SessionId;
use crate::domain::profile::{CandidateProfile, RequirementProfile};
use crate::ports::{AIProvider, CatalogueReader, CompletionOutput, CompletionRequest};

/// Seed sent with every assistant completion.
pub const ASSISTANT_SEED: u64 = 2345;

pub struct DialogueOrchestrator {
    assistant: Arc<dyn AIProvider>,
    gate: ModerationGate,
    confirmer: ProfileConfirmer,
    catalogue: Arc<dyn CatalogueReader>,
    seed: u64,
}

impl DialogueOrchestrator {
    /// `assistant` serves every completion except confirmation and is
    /// expected to be the retrying provider.
    pub fn new(
        assistant: Arc<dyn AIProvider>,
        gate: ModerationGate,
        confirmer: ProfileConfirmer,
        catalogue: Arc<dyn CatalogueReader>,
    ) -> Self {
        Self {
            assistant,
            gate,
            confirmer,
            catalogue,
            seed: ASSISTANT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn system_prompt(&self) -> String {
        prompts::elicitation_system_prompt(self.confirmer.min_budget())
    }

    /// Opens a new conversation with a generated welcome.
    pub async fn start(&self, session_id: SessionId) -> Result<ConversationContext, TurnError> {
        let mut ctx = ConversationContext::new(session_id, self.system_prompt());
        self.welcome(&mut ctx).await?;
        info!(session_id = %session_id, "Conversation started");
        Ok(ctx)
    }

    /// Drops the profile, both transcripts and presented products, then
    /// greets the user again.
    pub async fn restart(&self, ctx: &mut ConversationContext) -> Result<String, TurnError> {
        ctx.restart(self.system_prompt());
        let welcome = self.welcome(ctx).await?;
        info!(session_id = %ctx.session_id(), "Conversation restarted");
        Ok(welcome)
    }

    async fn welcome(&self, ctx: &mut ConversationContext) -> Result<String, TurnError> {
        let request =
            CompletionRequest::from_transcript("welcome", ctx.primary()).with_seed(self.seed);
        let welcome = self.assistant.complete(request).await?.output.into_text("welcome")?;
        ctx.record_welcome(welcome.clone());
        Ok(welcome)
    }

    /// Handles one user message.
    pub async fn handle_message(
        &self,
        ctx: &mut ConversationContext,
        text: &str,
    ) -> Result<TurnOutcome, TurnError> {
        if self.gate.check_text(text).await?.is_flagged() {
            return self.reset_after_flag(ctx).await;
        }

        match ctx.phase() {
            ConversationPhase::Eliciting => self.elicit(ctx, text).await,
            ConversationPhase::Discussing => self.discuss(ctx, text).await,
            phase => Err(TurnError::interrupted(phase)),
        }
    }

    async fn reset_after_flag(&self, ctx: &mut ConversationContext) -> Result<TurnOutcome, TurnError> {
        warn!(session_id = %ctx.session_id(), phase = ctx.phase().label(), "Flagged content, restarting");
        let welcome = self.restart(ctx).await?;
        Ok(TurnOutcome::Reset {
            notice: prompts::FLAGGED_NOTICE.to_string(),
            welcome,
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Eliciting / Confirming
    // ───────────────────────────────────────────────────────────────

    async fn elicit(&self, ctx: &mut ConversationContext, text: &str) -> Result<TurnOutcome, TurnError> {
        ctx.primary_mut()
            .push_user(format!("{}{}", text, prompts::DOMAIN_REMINDER));
        ctx.chat_log_mut().push_user(text);

        let request = CompletionRequest::from_transcript("elicitation", ctx.primary())
            .with_functions(declared_functions())
            .with_seed(self.seed);
        let response = self.assistant.complete(request).await?;

        match response.output {
            CompletionOutput::Text(reply) => {
                if self.gate.check_text(&reply).await?.is_flagged() {
                    return self.reset_after_flag(ctx).await;
                }
                ctx.primary_mut().push_assistant(reply.clone());
                ctx.chat_log_mut().push_bot(reply.clone());
                Ok(TurnOutcome::Reply { message: reply })
            }
            CompletionOutput::FunctionCall(invocation) => {
                let call = FunctionCall::resolve(&invocation)?;
                debug!(function = call.function().name(), "Model returned a candidate profile");
                self.confirm(ctx, call.into_candidate()).await
            }
        }
    }

    async fn confirm(
        &self,
        ctx: &mut ConversationContext,
        candidate: CandidateProfile,
    ) -> Result<TurnOutcome, TurnError> {
        ctx.advance_to(ConversationPhase::Confirming)?;
        let verdict = self.confirmer.confirm(&candidate).await?;

        if !verdict.is_confirmed() {
            let narration = candidate.to_json_string();
            ctx.primary_mut().push_assistant(narration.clone());
            ctx.chat_log_mut().push_bot(narration.clone());
            ctx.advance_to(ConversationPhase::Eliciting)?;
            info!(session_id = %ctx.session_id(), reason = ?verdict.reason, "Profile not confirmed");
            return Ok(TurnOutcome::Unconfirmed {
                narration,
                reason: verdict.reason,
            });
        }

        let candidate_json = candidate.to_value();
        let profile = candidate.into_requirement_profile(self.confirmer.min_budget())?;
        ctx.confirm_profile(profile.clone())?;

        ctx.primary_mut().push_user(TurnContent::Structured(candidate_json));
        ctx.primary_mut().push_assistant(prompts::FETCHING_TOP_MATCHES);
        ctx.chat_log_mut().push_bot(prompts::PROFILE_CONFIRMED_NOTICE);
        ctx.advance_to(ConversationPhase::Recommending)?;
        info!(session_id = %ctx.session_id(), budget = profile.budget(), "Profile confirmed");

        self.recommend(ctx, &profile).await
    }

    // ───────────────────────────────────────────────────────────────
    // Recommending
    // ───────────────────────────────────────────────────────────────

    async fn recommend(
        &self,
        ctx: &mut ConversationContext,
        profile: &RequirementProfile,
    ) -> Result<TurnOutcome, TurnError> {
        let catalogue = self.catalogue.load().await?;
        let products = validate_recommendations(score(profile, &catalogue.items));

        if products.is_empty() {
            ctx.chat_log_mut().push_bot(prompts::NO_MATCH_NOTICE);
            ctx.present(Vec::new(), None);
            ctx.advance_to(ConversationPhase::Discussing)?;
            info!(session_id = %ctx.session_id(), "No catalogue item qualified");
            return Ok(TurnOutcome::NoMatch {
                message: prompts::NO_MATCH_NOTICE.to_string(),
            });
        }

        let mut discussion = seed_discussion(&products);
        let request = CompletionRequest::from_transcript("recommendation", &discussion)
            .with_seed(self.seed);
        let recommendation = self
            .assistant
            .complete(request)
            .await?
            .output
            .into_text("recommendation")?;

        if self.gate.check_text(&recommendation).await?.is_flagged() {
            return self.reset_after_flag(ctx).await;
        }

        discussion.push_user(prompts::profile_message(&profile.to_json_string()));
        discussion.push_assistant(recommendation.clone());
        ctx.primary_mut().push_assistant(recommendation.clone());
        ctx.chat_log_mut().push_bot(recommendation.clone());
        ctx.present(products.clone(), Some(discussion));
        ctx.advance_to(ConversationPhase::Discussing)?;
        info!(session_id = %ctx.session_id(), products = products.len(), "Recommendations presented");

        Ok(TurnOutcome::Recommended {
            recommendation,
            products,
        })
    }

    // ───────────────────────────────────────────────────────────────
    // Discussing
    // ───────────────────────────────────────────────────────────────

    async fn discuss(&self, ctx: &mut ConversationContext, text: &str) -> Result<TurnOutcome, TurnError> {
        ctx.chat_log_mut().push_user(text);

        let Some(discussion) = ctx.recommendation_mut() else {
            ctx.chat_log_mut().push_bot(prompts::RECOMMENDATIONS_PROVIDED);
            return Ok(TurnOutcome::Reminder {
                message: prompts::RECOMMENDATIONS_PROVIDED.to_string(),
            });
        };
        discussion.push_user(text);
        let request = CompletionRequest::from_transcript("discussion", discussion).with_seed(self.seed);

        let reply = self
            .assistant
            .complete(request)
            .await?
            .output
            .into_text("discussion")?;

        if self.gate.check_text(&reply).await?.is_flagged() {
            return self.reset_after_flag(ctx).await;
        }

        if let Some(discussion) = ctx.recommendation_mut() {
            discussion.push_assistant(reply.clone());
        }
        ctx.primary_mut().push_assistant(reply.clone());
        ctx.chat_log_mut().push_bot(reply.clone());
        Ok(TurnOutcome::Reply { message: reply })
    }
}

/// Recommendation transcript opened with the qualifying products.
fn seed_discussion(products: &[ScoredItem]) -> Transcript {
    let products_json = serde_json::to_string(products).unwrap_or_else(|_| "[]".to_string());
    let mut transcript = Transcript::with_system_prompt(prompts::recommendation_system_prompt());
    transcript.push_user(prompts::products_message(&products_json));
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockModerator};
    use crate::domain::catalogue::{Catalogue, CatalogueError, CatalogueItem, FeatureProfile};
    use crate::domain::conversation::{Role, Speaker};
    use crate::domain::profile::{Level, DEFAULT_MIN_BUDGET};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const COMPLETE_ARGS: &str = r#"{"GPU intensity":"high","Display quality":"high",
        "Portability":"high","Multitasking":"high","Processing speed":"high","Budget":50000}"#;

    struct StaticCatalogue {
        items: Vec<CatalogueItem>,
        loads: AtomicUsize,
    }

    impl StaticCatalogue {
        fn new(items: Vec<CatalogueItem>) -> Arc<Self> {
            Arc::new(Self {
                items,
                loads: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CatalogueReader for StaticCatalogue {
        async fn load(&self) -> Result<Catalogue, CatalogueError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Catalogue::new(self.items.clone()))
        }
    }

    struct Harness {
        assistant: MockAIProvider,
        confirmer: MockAIProvider,
        moderator: MockModerator,
        catalogue: Arc<StaticCatalogue>,
    }

    impl Harness {
        fn new(assistant: MockAIProvider, items: Vec<CatalogueItem>) -> Self {
            Self {
                assistant,
                confirmer: MockAIProvider::new(),
                moderator: MockModerator::new().flagging("forbidden"),
                catalogue: StaticCatalogue::new(items),
            }
        }

        fn confirming_with(mut self, confirmer: MockAIProvider) -> Self {
            self.confirmer = confirmer;
            self
        }

        fn orchestrator(&self) -> DialogueOrchestrator {
            DialogueOrchestrator::new(
                Arc::new(self.assistant.clone()),
                ModerationGate::new(Arc::new(self.moderator.clone())),
                ProfileConfirmer::new(Arc::new(self.confirmer.clone()), DEFAULT_MIN_BUDGET),
                self.catalogue.clone(),
            )
        }
    }

    fn laptop(name: &str, price: u64, level: Level) -> CatalogueItem {
        CatalogueItem::new(name, price, FeatureProfile::uniform(level))
    }

    async fn started(orchestrator: &DialogueOrchestrator) -> ConversationContext {
        orchestrator.start(SessionId::new()).await.unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // Starting and restarting
    // ───────────────────────────────────────────────────────────────

    mod lifecycle {
        use super::*;

        #[tokio::test]
        async fn start_seeds_transcript_with_prompt_and_welcome() {
            let harness = Harness::new(MockAIProvider::new().with_response("Welcome!"), vec![]);
            let ctx = started(&harness.orchestrator()).await;

            assert_eq!(ctx.phase(), ConversationPhase::Eliciting);
            assert_eq!(ctx.primary().len(), 2);
            assert_eq!(ctx.primary().turns()[0].role, Role::System);
            assert_eq!(ctx.chat_log().last_bot_message(), Some("Welcome!"));

            let welcome_call = &harness.assistant.get_calls()[0];
            assert!(!welcome_call.allows_function_calls());
            assert_eq!(welcome_call.seed, Some(ASSISTANT_SEED));
        }

        #[tokio::test]
        async fn restart_clears_everything_but_the_session_id() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_response("What will you use it for?")
                .with_response("Welcome back!");
            let harness = Harness::new(assistant, vec![]);
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;
            let id = ctx.session_id();
            orchestrator.handle_message(&mut ctx, "hi").await.unwrap();

            let welcome = orchestrator.restart(&mut ctx).await.unwrap();

            assert_eq!(welcome, "Welcome back!");
            assert_eq!(ctx.session_id(), id);
            assert_eq!(ctx.chat_log().len(), 1);
            assert_eq!(ctx.primary().len(), 2);
            assert!(ctx.profile().is_none());
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Eliciting
    // ───────────────────────────────────────────────────────────────

    mod eliciting {
        use super::*;

        #[tokio::test]
        async fn free_text_reply_keeps_eliciting() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_response("Do you game?");
            let harness = Harness::new(assistant, vec![]);
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let outcome = orchestrator
                .handle_message(&mut ctx, "I edit video")
                .await
                .unwrap();

            assert_eq!(
                outcome,
                TurnOutcome::Reply {
                    message: "Do you game?".into()
                }
            );
            assert_eq!(ctx.phase(), ConversationPhase::Eliciting);

            let user_turn = &ctx.primary().turns()[2];
            assert_eq!(
                user_turn.content.as_text(),
                Some(format!("I edit video{}", prompts::DOMAIN_REMINDER).as_str())
            );
            assert_eq!(ctx.chat_log().entries()[1].text, "I edit video");
            assert_eq!(ctx.chat_log().entries()[1].speaker, Speaker::User);

            let call = &harness.assistant.get_calls()[1];
            assert!(call.allows_function_calls());
            assert_eq!(call.functions.len(), 2);
        }

        #[tokio::test]
        async fn flagged_user_message_resets_conversation() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_response("Fresh welcome");
            let harness = Harness::new(assistant, vec![]);
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let outcome = orchestrator
                .handle_message(&mut ctx, "something forbidden")
                .await
                .unwrap();

            assert_eq!(
                outcome,
                TurnOutcome::Reset {
                    notice: prompts::FLAGGED_NOTICE.into(),
                    welcome: "Fresh welcome".into(),
                }
            );
            assert_eq!(ctx.chat_log().len(), 1);
            assert!(ctx.profile().is_none());
            assert_eq!(ctx.phase(), ConversationPhase::Eliciting);
            // the flagged text never reached the assistant
            assert_eq!(harness.assistant.calls_for("elicitation").len(), 0);
        }

        #[tokio::test]
        async fn flagged_assistant_reply_resets_conversation() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_response("a forbidden reply")
                .with_response("Fresh welcome");
            let harness = Harness::new(assistant, vec![]);
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let outcome = orchestrator.handle_message(&mut ctx, "hello").await.unwrap();

            assert!(matches!(outcome, TurnOutcome::Reset { .. }));
            assert_eq!(ctx.chat_log().last_bot_message(), Some("Fresh welcome"));
        }

        #[tokio::test]
        async fn incomplete_profile_returns_to_eliciting_without_scoring() {
            let assistant = MockAIProvider::new().with_response("Welcome!").with_function_call(
                "get_user_info",
                r#"{"GPU intensity":"high","Display quality":"high","Portability":"low",
                    "Multitasking":"high","Processing speed":"high"}"#,
            );
            let harness = Harness::new(assistant, vec![laptop("A", 30_000, Level::High)]);
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let outcome = orchestrator
                .handle_message(&mut ctx, "that's all")
                .await
                .unwrap();

            let TurnOutcome::Unconfirmed { narration, reason } = outcome else {
                panic!("expected an unconfirmed profile");
            };
            assert!(reason.unwrap().contains("Budget"));
            assert!(narration.contains("GPU intensity"));
            assert_eq!(ctx.phase(), ConversationPhase::Eliciting);
            assert!(ctx.profile().is_none());
            assert_eq!(harness.catalogue.loads.load(Ordering::SeqCst), 0);
            assert_eq!(ctx.primary().last().unwrap().role, Role::Assistant);
        }

        #[tokio::test]
        async fn unknown_function_is_malformed_output() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_function_call("book_flight", "{}");
            let harness = Harness::new(assistant, vec![]);
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let err = orchestrator.handle_message(&mut ctx, "go").await.unwrap_err();

            assert!(matches!(err, TurnError::MalformedModelOutput(msg) if msg.contains("book_flight")));
        }

        #[tokio::test]
        async fn turn_in_transient_phase_is_rejected() {
            let harness = Harness::new(MockAIProvider::new().with_response("Welcome!"), vec![]);
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;
            ctx.advance_to(ConversationPhase::Confirming).unwrap();

            let err = orchestrator.handle_message(&mut ctx, "hi").await.unwrap_err();
            assert!(matches!(err, TurnError::InvalidTransition(_)));
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Recommending and discussing
    // ───────────────────────────────────────────────────────────────

    mod recommending {
        use super::*;

        fn confirming_yes() -> MockAIProvider {
            MockAIProvider::new().with_response(r#"{"result": "Yes"}"#)
        }

        #[tokio::test]
        async fn confirmed_profile_is_scored_and_recommended() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_function_call("compare_laptops_with_user", COMPLETE_ARGS)
                .with_response("1. Zen : great, Rs 30000");
            let items = vec![
                laptop("Budget", 20_000, Level::Low),
                laptop("Zen", 30_000, Level::High),
                laptop("Pricey", 60_000, Level::High),
            ];
            let harness = Harness::new(assistant, items).confirming_with(confirming_yes());
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let outcome = orchestrator
                .handle_message(&mut ctx, "budget 50k, want the best")
                .await
                .unwrap();

            let TurnOutcome::Recommended {
                recommendation,
                products,
            } = outcome
            else {
                panic!("expected recommendations");
            };
            assert_eq!(recommendation, "1. Zen : great, Rs 30000");
            assert_eq!(products.len(), 1);
            assert_eq!(products[0].item().name(), "Zen");
            assert_eq!(products[0].score(), 5);

            assert_eq!(ctx.phase(), ConversationPhase::Discussing);
            assert_eq!(ctx.profile().unwrap().budget(), 50_000);

            let log: Vec<&str> = ctx.chat_log().entries().iter().map(|e| e.text.as_str()).collect();
            assert_eq!(
                log,
                vec![
                    "Welcome!",
                    "budget 50k, want the best",
                    prompts::PROFILE_CONFIRMED_NOTICE,
                    "1. Zen : great, Rs 30000",
                ]
            );

            let discussion = ctx.recommendation().unwrap();
            assert_eq!(discussion.len(), 4);
            assert!(discussion.turns()[1]
                .content
                .render()
                .starts_with("These are the user's products: "));

            let reco_call = &harness.assistant.calls_for("recommendation")[0];
            assert!(!reco_call.allows_function_calls());
        }

        #[tokio::test]
        async fn weak_matches_lead_to_no_match_and_then_reminder() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_function_call("get_user_info", COMPLETE_ARGS);
            let items = vec![
                laptop("A", 30_000, Level::Low),
                laptop("B", 35_000, Level::Medium),
                laptop("C", 40_000, Level::Low),
            ];
            let harness = Harness::new(assistant, items).confirming_with(confirming_yes());
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let outcome = orchestrator.handle_message(&mut ctx, "done").await.unwrap();

            assert_eq!(
                outcome,
                TurnOutcome::NoMatch {
                    message: prompts::NO_MATCH_NOTICE.into()
                }
            );
            assert_eq!(ctx.phase(), ConversationPhase::Discussing);
            assert_eq!(ctx.presented(), Some(&[][..]));
            assert!(ctx.recommendation().is_none());

            let follow_up = orchestrator
                .handle_message(&mut ctx, "anything else?")
                .await
                .unwrap();
            assert_eq!(
                follow_up,
                TurnOutcome::Reminder {
                    message: prompts::RECOMMENDATIONS_PROVIDED.into()
                }
            );
            assert_eq!(harness.assistant.calls_for("discussion").len(), 0);
        }

        #[tokio::test]
        async fn follow_up_questions_use_recommendation_transcript() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_function_call("get_user_info", COMPLETE_ARGS)
                .with_response("1. Zen")
                .with_response("Zen weighs 1.2 kg.");
            let harness = Harness::new(assistant, vec![laptop("Zen", 30_000, Level::High)])
                .confirming_with(confirming_yes());
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;
            orchestrator.handle_message(&mut ctx, "done").await.unwrap();

            let outcome = orchestrator
                .handle_message(&mut ctx, "how heavy is it?")
                .await
                .unwrap();

            assert_eq!(
                outcome,
                TurnOutcome::Reply {
                    message: "Zen weighs 1.2 kg.".into()
                }
            );
            assert_eq!(ctx.recommendation().unwrap().len(), 6);
            assert_eq!(ctx.phase(), ConversationPhase::Discussing);
            let discussion_call = &harness.assistant.calls_for("discussion")[0];
            assert_eq!(discussion_call.messages.last().unwrap().content, "how heavy is it?");
        }

        #[tokio::test]
        async fn flagged_recommendation_resets_conversation() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_function_call("get_user_info", COMPLETE_ARGS)
                .with_response("forbidden advice")
                .with_response("Fresh welcome");
            let harness = Harness::new(assistant, vec![laptop("Zen", 30_000, Level::High)])
                .confirming_with(confirming_yes());
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let outcome = orchestrator.handle_message(&mut ctx, "done").await.unwrap();

            assert!(matches!(outcome, TurnOutcome::Reset { .. }));
            assert!(ctx.profile().is_none());
            assert!(ctx.presented().is_none());
            assert_eq!(ctx.chat_log().len(), 1);
        }

        #[tokio::test]
        async fn unparsable_confirmation_is_a_hard_failure() {
            let assistant = MockAIProvider::new()
                .with_response("Welcome!")
                .with_function_call("get_user_info", COMPLETE_ARGS);
            let harness = Harness::new(assistant, vec![])
                .confirming_with(MockAIProvider::new().with_response("sure, looks fine"));
            let orchestrator = harness.orchestrator();
            let mut ctx = started(&orchestrator).await;

            let err = orchestrator.handle_message(&mut ctx, "done").await.unwrap_err();
            assert_eq!(err.code(), crate::domain::foundation::ErrorCode::MalformedModelOutput);
        }
    }
}
