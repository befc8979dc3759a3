//! study-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `STUDY_*` environment variables, opens the SQLite store and the legacy
//! data directory, and either serves HTTP or runs a one-off migration.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash`:
//!
//! ```text
//! cargo run -p study-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::{Parser, Subcommand, ValueEnum};
use rand_core::OsRng;
use study_content::ContentService;
use study_core::content::ContentKind;
use study_legacy::FlatFileStore;
use study_server::{AppState, ServerConfig, auth::AuthConfig};
use study_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Study content server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Import legacy JSON content into the database and exit.
  Migrate {
    #[arg(value_enum, default_value_t = MigrateTarget::All)]
    target: MigrateTarget,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum MigrateTarget {
  Flashcards,
  Quizzes,
  All,
}

impl MigrateTarget {
  fn kinds(self) -> &'static [ContentKind] {
    match self {
      Self::Flashcards => &[ContentKind::Flashcards],
      Self::Quizzes => &[ContentKind::Quizzes],
      Self::All => &[ContentKind::Flashcards, ContentKind::Quizzes],
    }
  }
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
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("STUDY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let database_path = expand_tilde(&server_cfg.database_path);
  let data_dir = expand_tilde(&server_cfg.data_dir);

  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;
  let service =
    ContentService::new(Arc::new(store), Arc::new(FlatFileStore::new(data_dir)));

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(service, server_cfg).await,
    Command::Migrate { target } => migrate(&service, target).await,
  }
}

async fn serve(
  service: ContentService<SqliteStore>,
  cfg: ServerConfig,
) -> anyhow::Result<()> {
  if cfg.admin_password_hash.is_empty() {
    tracing::warn!("admin_password_hash is not set; admin API will refuse every request");
  }

  let state = AppState {
    service,
    auth: Arc::new(AuthConfig {
      username:      cfg.admin_username.clone(),
      password_hash: cfg.admin_password_hash.clone(),
    }),
  };

  let app = study_server::router(state);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

async fn migrate(
  service: &ContentService<SqliteStore>,
  target: MigrateTarget,
) -> anyhow::Result<()> {
  let mut failed = Vec::new();
  for &kind in target.kinds() {
    let report = service.migrate(kind).await;
    println!("{kind}: {}", report.message);
    if !report.success {
      failed.push(kind);
    }
  }

  if !failed.is_empty() {
    anyhow::bail!("migration failed for {failed:?}");
  }
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
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
