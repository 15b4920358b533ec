//! `server`: serves the Evidex evidence API.
//!
//! Startup loads [`ServerConfig`], reads the evidence snapshot at `seed_path`
//! into a [`MemoryStore`], and mounts the API behind Basic auth for the single
//! configured account.
//!
//! Run with `--hash-password` to turn a password read from stdin into the
//! argon2 string that goes in `auth_password_hash`.

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use evidex_server::{
  ServerConfig,
  auth::{PasswordSessions, hash_password},
};
use evidex_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Evidex evidence API server")]
struct Cli {
  /// Server configuration (TOML). Missing keys fall back to `EVIDEX_*`.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the `auth_password_hash` value for a password read from stdin.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = prompt_password()?;
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

  let store = open_store(&cfg).await?;
  let sessions = PasswordSessions {
    username:      cfg.auth_username.clone(),
    password_hash: cfg.auth_password_hash.clone(),
  };
  let app = evidex_server::router(Arc::new(store), Arc::new(sessions));

  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(%address, account = %cfg.auth_username, "evidex API listening");

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

/// The evidence snapshot named by `seed_path`, or an empty store.
async fn open_store(cfg: &ServerConfig) -> anyhow::Result<MemoryStore> {
  let Some(path) = &cfg.seed_path else {
    tracing::warn!("no seed_path configured; serving an empty evidence store");
    return Ok(MemoryStore::new());
  };
  let store = MemoryStore::open(path)
    .await
    .with_context(|| format!("failed to load evidence seed {}", path.display()))?;
  tracing::info!(seed = %path.display(), "evidence seed loaded");
  Ok(store)
}

/// Read one line from stdin; an empty password is refused.
fn prompt_password() -> anyhow::Result<String> {
  eprint!("Password for the evidex account: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\n', '\r']);
  anyhow::ensure!(!password.is_empty(), "password must not be empty");
  Ok(password.to_owned())
}
