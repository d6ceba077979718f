use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use laptop_advisor::adapters::http::{app_router, AdminAppState, ChatAppState};
use laptop_advisor::adapters::{
    CatalogueColumns, CsvCatalogue, InMemorySessionStore, OpenAIConfig, OpenAIModerator,
    OpenAIProvider, RetryPolicy, RetryingProvider,
};
use laptop_advisor::application::handlers::regeneration::RegenerationProgress;
use laptop_advisor::application::{
    CatalogueRegenerator, DialogueOrchestrator, FeatureClassifier, ModerationGate,
    ProfileConfirmer, RegenerationTask, TurnOutcome,
};
use laptop_advisor::config::AppConfig;
use laptop_advisor::domain::catalogue::{score, validate_recommendations};
use laptop_advisor::domain::foundation::SessionId;
use laptop_advisor::domain::profile::RequirementProfile;
use laptop_advisor::ports::{AIProvider, CatalogueReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the chat and admin JSON API.
    Serve,
    /// Talk to the advisor from the terminal.
    Chat,
    /// Rebuild the scored catalogue from the raw descriptions.
    Regenerate,
    /// Rank the catalogue against a requirement profile, without any model calls.
    Score {
        /// JSON file holding a requirement profile
        #[arg(long)]
        profile: PathBuf,
    },
}

/// How often idle chat sessions are swept from memory.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Everything that talks to the model, built once from config.
struct Components {
    orchestrator: Arc<DialogueOrchestrator>,
    regenerator: Arc<CatalogueRegenerator>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.server.log_level, cli.json);
    info!(command = ?cli.command, "laptop-advisor starting");

    match cli.command {
        Commands::Serve => serve(&config).await,
        Commands::Chat => chat(&config).await,
        Commands::Regenerate => regenerate(&config).await,
        Commands::Score { profile } => score_catalogue(&config, &profile).await,
    }
}

fn init_tracing(default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn catalogue_for(config: &AppConfig) -> CsvCatalogue {
    let settings = &config.catalogue;
    CsvCatalogue::new(&settings.path, &settings.source_path)
        .with_columns(CatalogueColumns {
            name: settings.name_column.clone(),
            brand: settings.brand_column.clone(),
            price: settings.price_column.clone(),
            description: settings.description_column.clone(),
            features: settings.feature_column.clone(),
        })
        .with_strict(settings.strict)
}

fn build_components(config: &AppConfig) -> Result<Components> {
    let ai = &config.ai;
    let api_key = ai.require_api_key()?;

    let mut openai = OpenAIConfig::new(api_key)
        .with_model(&ai.model)
        .with_base_url(&ai.base_url)
        .with_timeout(ai.timeout());
    if let Some(model) = &ai.moderation_model {
        openai = openai.with_moderation_model(model);
    }

    let raw: Arc<dyn AIProvider> =
        Arc::new(OpenAIProvider::new(openai.clone()).context("Failed to build OpenAI client")?);
    let policy = RetryPolicy::new(ai.retry_max_attempts, ai.retry_min_delay(), ai.retry_max_delay());
    let retrying: Arc<dyn AIProvider> = Arc::new(RetryingProvider::new(raw.clone(), policy));
    let moderator = Arc::new(OpenAIModerator::new(openai).context("Failed to build moderation client")?);

    let catalogue = Arc::new(catalogue_for(config));
    let confirmer = ProfileConfirmer::new(raw, config.conversation.min_budget)
        .with_seed(ai.confirmation_seed);
    let orchestrator = DialogueOrchestrator::new(
        retrying.clone(),
        ModerationGate::new(moderator),
        confirmer,
        catalogue.clone(),
    )
    .with_seed(ai.seed);

    let regenerator = CatalogueRegenerator::new(
        catalogue,
        FeatureClassifier::new(retrying).with_seed(ai.seed),
        &config.catalogue.description_column,
        &config.catalogue.feature_column,
    );

    Ok(Components {
        orchestrator: Arc::new(orchestrator),
        regenerator: Arc::new(regenerator),
    })
}

async fn serve(config: &AppConfig) -> Result<()> {
    let components = build_components(config)?;
    let sessions = InMemorySessionStore::new()
        .with_idle_timeout(config.conversation.session_idle_timeout())
        .with_max_sessions(config.conversation.max_sessions);
    let _sweeper = sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL);
    let chat = ChatAppState::new(components.orchestrator, Arc::new(sessions));
    let admin = AdminAppState::new(RegenerationTask::new(components.regenerator));
    let app = app_router(chat, admin, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app).await.context("Server terminated")?;
    Ok(())
}

async fn chat(config: &AppConfig) -> Result<()> {
    let components = build_components(config)?;
    let orchestrator = components.orchestrator;

    let mut ctx = orchestrator.start(SessionId::new()).await?;
    print_bot(ctx.chat_log().last_bot_message().unwrap_or_default());
    println!("(type 'restart' to start over, 'exit' to quit)");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        match text {
            "" => continue,
            "exit" | "quit" => break,
            "restart" => {
                let welcome = orchestrator.restart(&mut ctx).await?;
                print_bot(&welcome);
                continue;
            }
            _ => {}
        }

        match orchestrator.handle_message(&mut ctx, text).await {
            Ok(TurnOutcome::Reset { notice, welcome }) => {
                print_bot(&notice);
                print_bot(&welcome);
            }
            Ok(TurnOutcome::Recommended { recommendation, products }) => {
                print_bot(&format!("Found {} matching laptops.", products.len()));
                print_bot(&recommendation);
            }
            Ok(outcome) => print_bot(outcome.message()),
            Err(err) => {
                error!(error = %err, "Turn failed, starting a new conversation");
                eprintln!("Something went wrong: {err}. Starting over.");
                ctx = orchestrator.start(SessionId::new()).await?;
                print_bot(ctx.chat_log().last_bot_message().unwrap_or_default());
            }
        }
    }

    Ok(())
}

fn print_bot(text: &str) {
    println!("\nAdvisor: {text}\n");
}

async fn regenerate(config: &AppConfig) -> Result<()> {
    let components = build_components(config)?;
    let progress = RegenerationProgress::new();

    let written = components
        .regenerator
        .regenerate(&progress)
        .await
        .context("Catalogue regeneration failed")?;

    info!(rows = written, path = %config.catalogue.path.display(), "Catalogue regenerated");
    println!("Wrote {written} rows to {}", config.catalogue.path.display());
    Ok(())
}

async fn score_catalogue(config: &AppConfig, profile_path: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(profile_path)
        .await
        .with_context(|| format!("Failed to read {}", profile_path.display()))?;
    let profile: RequirementProfile =
        serde_json::from_str(&raw).context("Profile file is not a valid requirement profile")?;

    let catalogue = catalogue_for(config);
    let loaded = catalogue.load().await.context("Failed to load catalogue")?;
    if !loaded.skipped.is_empty() {
        info!(skipped = loaded.skipped.len(), "Some catalogue rows were skipped");
    }

    let ranked = validate_recommendations(score(&profile, &loaded.items));
    if ranked.is_empty() {
        println!("No laptops match this profile.");
        return Ok(());
    }

    let brand_column = &catalogue.columns().brand;
    for (position, scored) in ranked.iter().enumerate() {
        let item = scored.item();
        let brand = item.details().get(brand_column).map(String::as_str).unwrap_or("-");
        println!(
            "{}. {} {} - INR {} (score {})",
            position + 1,
            brand,
            item.name(),
            item.price(),
            scored.score()
        );
    }
    Ok(())
}
