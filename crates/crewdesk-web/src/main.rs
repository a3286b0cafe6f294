//! crewdesk server binary.
//!
//! Reads `crewdesk.toml` (or the path given with `--config`), then
//! `CREWDESK_*` environment variables, then `DATABASE_URL` and
//! `SESSION_SECRET`. Opens the SQLite store and serves the site over HTTP.
//!
//! # Admin accounts
//!
//! ```text
//! crewdesk create-admin alice      # prompts for a password on stdin
//! crewdesk hash-password           # prints an argon2 PHC string
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use crewdesk_core::store::RecruitmentStore;
use crewdesk_store_sqlite::SqliteStore;
use crewdesk_web::{AppState, ServerConfig, auth::hash_password};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Crewdesk recruitment server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "crewdesk.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run the HTTP server (default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Create an admin account; the password is read from stdin.
  CreateAdmin { username: String },
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

  match cli.command.unwrap_or(Command::Serve) {
    Command::HashPassword => {
      let password = read_password()?;
      println!("{}", hash_password(&password)?);
      Ok(())
    }
    Command::CreateAdmin { username } => {
      let config = load_config(&cli.config)?;
      let store = open_store(&config.database_url).await?;
      let password = read_password()?;
      anyhow::ensure!(!password.is_empty(), "password must not be empty");
      let admin = store
        .create_admin(username, hash_password(&password)?)
        .await
        .context("failed to create admin")?;
      tracing::info!(admin_id = admin.admin_id, username = %admin.username, "admin created");
      Ok(())
    }
    Command::Serve => serve(load_config(&cli.config)?).await,
  }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
  anyhow::ensure!(
    !config.session_secret.is_empty(),
    "session_secret is not set (use the config file, CREWDESK_SESSION_SECRET or SESSION_SECRET)"
  );

  tokio::fs::create_dir_all(&config.upload_dir)
    .await
    .with_context(|| format!("failed to create upload directory {:?}", config.upload_dir))?;

  let store = open_store(&config.database_url).await?;
  let address = format!("{}:{}", config.host, config.port);
  let app = crewdesk_web::router(AppState::new(store, config));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("CREWDESK").try_parsing(true))
    .set_override_option("database_url", std::env::var("DATABASE_URL").ok())?
    .set_override_option("session_secret", std::env::var("SESSION_SECRET").ok())?
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Where a `database_url` points.
#[derive(Debug, PartialEq, Eq)]
enum DatabaseLocation {
  Memory,
  File(PathBuf),
}

fn parse_database_url(url: &str) -> DatabaseLocation {
  let url = url.trim();
  if matches!(url, "sqlite::memory:" | ":memory:") {
    return DatabaseLocation::Memory;
  }
  let path = url
    .strip_prefix("sqlite://")
    .or_else(|| url.strip_prefix("sqlite:"))
    .unwrap_or(url);
  DatabaseLocation::File(expand_tilde(Path::new(path)))
}

async fn open_store(database_url: &str) -> anyhow::Result<SqliteStore> {
  match parse_database_url(database_url) {
    DatabaseLocation::Memory => {
      tracing::warn!("using an in-memory database; data is lost on exit");
      SqliteStore::open_in_memory()
        .await
        .context("failed to open in-memory store")
    }
    DatabaseLocation::File(path) => SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {path:?}")),
  }
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
