//! Hare and Hounds - game server CLI

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use hare_hounds::MatchId;
use hare_hounds_server::{InMemoryStore, MatchRepository, MatchService, MatchStore, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
            in_memory,
        } => {
            let config = load_config(config)?.with_overrides(host, port, db_path);
            init_tracing(config.log_filter());
            run_server(config, in_memory).await
        }
        Command::Inspect { game_id, db_path } => {
            let config = load_config(None)?.with_overrides(None, None, db_path);
            init_tracing(config.log_filter());
            inspect(&config, MatchId::new(game_id))
        }
    }
}

/// Defaults, then the TOML file if given, then `DATABASE_URL`.
fn load_config(path: Option<PathBuf>) -> Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    Ok(config.with_env())
}

fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

/// Run the HTTP game server
#[instrument(skip(config), fields(address = %config.bind_address()))]
async fn run_server(config: ServerConfig, in_memory: bool) -> Result<()> {
    let store: Arc<dyn MatchStore> = if in_memory {
        info!("Using in-memory store, matches will not survive a restart");
        Arc::new(InMemoryStore::new())
    } else {
        let repo = MatchRepository::new(config.database_path().clone())?;
        repo.run_migrations()?;
        Arc::new(repo)
    };

    let service = Arc::new(MatchService::new(store)?);
    info!(restored = service.live_count(), "Match service ready");

    let app = hare_hounds_server::app(service);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Server ready at http://{}{}", config.bind_address(), hare_hounds_server::API_BASE);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Print a stored match
#[instrument(skip(config))]
fn inspect(config: &ServerConfig, id: MatchId) -> Result<()> {
    let repo = MatchRepository::new(config.database_path().clone())?;
    let game = repo
        .find(id)?
        .with_context(|| format!("match {} not found in {}", id, config.database_path()))?;

    let seat = |p: Option<hare_hounds::PlayerId>| p.map_or("-".to_string(), |p| p.to_string());
    println!("Match {}", game.id());
    println!("  state:  {}", game.state());
    println!("  hounds: {}", seat(game.hound_player()));
    println!("  hare:   {}", seat(game.hare_player()));
    println!("  placements seen: {}", game.ledger().len());
    println!();
    print!("{}", game.board().display());
    Ok(())
}
