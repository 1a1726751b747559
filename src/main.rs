//! WorldForge CLI
//!
//! Runs one user's world-creation interview over stdin/stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worldforge::services::world::UnavailableWorldGenerator;
use worldforge::storage::ConfigService;
use worldforge::{AppState, InterviewReply};

/// WorldForge interview CLI
#[derive(Parser)]
#[command(name = "worldforge")]
#[command(about = "Design a world through a guided interview", long_about = None)]
#[command(version)]
struct Cli {
    /// User whose interview to start or resume
    #[arg(short, long, env = "WORLDFORGE_USER")]
    user: String,

    /// Configuration file path (defaults to ~/.worldforge/config.json)
    #[arg(short, long, env = "WORLDFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Re-run generation for an existing world and exit
    #[arg(long, value_name = "WORLD_ID")]
    regenerate: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn print_reply(reply: &InterviewReply) {
    println!("\n{}\n", reply.message);
    if let Some(world_id) = &reply.world_id {
        println!("World id: {}", world_id);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => ConfigService::open(path.clone()),
        None => ConfigService::new(),
    }
    .context("Failed to load configuration")?;

    let state = AppState::initialize(config, Arc::new(UnavailableWorldGenerator))
        .context("Failed to initialize")?;
    if !state.is_database_healthy() {
        anyhow::bail!("Database is not responding");
    }
    let settings = state.get_config().await;
    tracing::info!(
        model = %settings.provider.model,
        world_shape = %settings.default_world_shape,
        "Worldforge ready"
    );
    let interviews = state.interviews();

    if let Some(world_id) = &cli.regenerate {
        let world = interviews
            .regenerate(world_id)
            .await
            .with_context(|| format!("Failed to regenerate world {}", world_id))?;
        println!("World {} regenerated.", world.id);
        return Ok(());
    }

    print_reply(&interviews.start(&cli.user).await?);
    println!("(Type /resume to repeat the question, /complete to confirm, /quit to exit.)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let result = match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/resume" => interviews.resume(&cli.user).await,
            "/complete" => interviews.complete(&cli.user).await,
            text => interviews.process(&cli.user, text).await,
        };

        match result {
            Ok(reply) => {
                print_reply(&reply);
                if reply.interview.is_completed() {
                    break;
                }
            }
            Err(e) if e.is_upstream() => {
                eprintln!("The world-building assistant is unavailable right now: {}", e);
                eprintln!("Your progress is saved; try again or type /resume.");
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}
