use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizdash::config::{Config, Preset, TriggerMode};
use quizdash::console;
use quizdash::state::AppState;
use quizdash::store::{FileStore, StateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Role {
    /// Host console: select, judge, advance
    Operator,
    /// Audience screen polling the store
    Public,
    /// Host console plus in-process audio cues
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "quizdash", about = "Two-screen quiz show display")]
struct Args {
    #[arg(value_enum, default_value_t = Role::Operator)]
    role: Role,
    /// classic, science or science-floored (overrides QUIZDASH_VARIANT)
    #[arg(long)]
    variant: Option<String>,
    /// Store directory shared by both roles (overrides QUIZDASH_STORE_DIR)
    #[arg(long)]
    store_dir: Option<PathBuf>,
    /// Storage key (overrides the variant's key)
    #[arg(long)]
    key: Option<String>,
    /// Operator: ignore any stored session and start over
    #[arg(long)]
    fresh: bool,
    /// Public: re-fire cues on every poll (level-triggered)
    #[arg(long)]
    level_trigger: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Logs go to stderr so the screens on stdout stay readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizdash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let preset = args.variant.as_deref().map(str::parse::<Preset>).transpose()?;
    let mut config = Config::from_env_with(preset)?;
    if let Some(dir) = args.store_dir {
        config.store_dir = dir;
    }
    if let Some(key) = args.key {
        config.variant.storage_key = key;
    }
    if args.level_trigger {
        config.variant.trigger_mode = TriggerMode::Level;
    }

    tracing::info!(
        "Starting quizdash {:?} (variant '{}', store {}, key '{}')",
        args.role,
        config.variant.name,
        config.store_dir.display(),
        config.variant.storage_key
    );

    let store = StateStore::new(
        Arc::new(FileStore::new(config.store_dir.clone())),
        config.variant.storage_key.clone(),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    match args.role {
        Role::Public => {
            console::run_public(store, &config.variant, shutdown_rx).await;
        }
        Role::Operator | Role::Both => {
            let state = if args.fresh {
                AppState::new(config.variant, store)
            } else {
                AppState::resume(config.variant, store)
            };
            let state = Arc::new(state);
            if args.role == Role::Both {
                console::run_both(state, shutdown_rx).await?;
            } else {
                console::run_operator(state, shutdown_rx).await?;
            }
        }
    }

    Ok(())
}
