//! jobtrack-mcp server binary.
//!
//! Reads `jobtrack.toml` (or the path given with `--config`), then
//! `JOBTRACK_*` environment variables, then command-line flags. Opens the
//! SQLite store and serves MCP over stdio or HTTP.
//!
//! # One-off maintenance
//!
//! ```text
//! jobtrack-mcp --init-db
//! jobtrack-mcp --import-resume backend ./resume-backend.md --default
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use jobtrack_core::{resume::NewResumeVersion, store::TrackerStore as _};
use jobtrack_mcp::{
  AppState, Server, Transport,
  settings::{ConfigOverrides, expand_tilde, load_config},
};
use jobtrack_store_sqlite::{DatabaseLocation, SqliteStore};
use tokio::{io::BufReader, net::TcpListener};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Job application tracker MCP server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, env = "JOBTRACK_CONFIG", default_value = "jobtrack.toml")]
  config: PathBuf,

  /// Database connection string, e.g. `sqlite://~/jobs.db`.
  #[arg(long)]
  database_url: Option<String>,

  /// `stdio` or `http`.
  #[arg(long)]
  transport: Option<Transport>,

  /// Create the schema and exit.
  #[arg(long)]
  init_db: bool,

  /// Store the text of FILE as resume version NAME and exit.
  #[arg(long, num_args = 2, value_names = ["NAME", "FILE"])]
  import_resume: Option<Vec<String>>,

  /// With `--import-resume`: make the imported version the default.
  #[arg(long, requires = "import_resume")]
  default: bool,

  /// With `--import-resume`: a short description of the version.
  #[arg(long, requires = "import_resume")]
  description: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout belongs to the stdio transport.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let overrides = ConfigOverrides {
    database_url: cli.database_url.clone(),
    transport:    cli.transport,
  };
  let server_cfg = load_config(&cli.config, &overrides)
    .with_context(|| format!("failed to read configuration from {}", cli.config.display()))?;

  let location = match DatabaseLocation::parse(&server_cfg.database_url)
    .with_context(|| format!("invalid database_url {:?}", server_cfg.database_url))?
  {
    DatabaseLocation::File(path) => {
      let home = std::env::var_os("HOME").map(PathBuf::from);
      DatabaseLocation::File(expand_tilde(&path, home.as_deref()))
    }
    memory => memory,
  };

  let store = SqliteStore::connect(&location)
    .await
    .with_context(|| format!("failed to open store at {location:?}"))?;

  if cli.init_db {
    let version = store.schema_version().await.context("failed to read schema version")?;
    tracing::info!(?location, version, "database initialised");
    return Ok(());
  }

  if let Some([name, file]) = cli.import_resume.as_deref() {
    let content = tokio::fs::read_to_string(file)
      .await
      .with_context(|| format!("failed to read {file}"))?;
    let input = NewResumeVersion {
      description: cli.description.clone(),
      is_default: cli.default,
      ..NewResumeVersion::new(name.trim(), content)
    };
    input.validate()?;
    let resume = store
      .add_resume_version(input)
      .await
      .map_err(jobtrack_core::Error::from)
      .with_context(|| format!("failed to import resume {name:?}"))?;
    tracing::info!(name = %resume.name, default = resume.is_default, "resume imported");
    return Ok(());
  }

  let server = Arc::new(Server::new(Arc::new(store), server_cfg.server_name.clone()));

  match server_cfg.transport {
    Transport::Stdio => {
      tracing::info!(name = %server_cfg.server_name, "serving MCP on stdio");
      let reader = BufReader::new(tokio::io::stdin());
      jobtrack_mcp::stdio::serve(&*server, reader, tokio::io::stdout())
        .await
        .context("stdio transport failed")?;
    }
    Transport::Http => {
      let app = jobtrack_mcp::router(AppState { server });
      let address = format!("{}:{}", server_cfg.host, server_cfg.port);

      tracing::info!("Listening on http://{address}/mcp");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}
