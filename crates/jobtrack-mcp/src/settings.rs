//! Server configuration and how it is assembled.
//!
//! Sources, later ones winning: built-in defaults, `DATABASE_URL`, the TOML
//! file, `JOBTRACK_*` variables, command-line flags.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use strum::{Display, EnumString};

// ─── Configuration ───────────────────────────────────────────────────────────

/// How the server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Transport {
  #[default]
  Stdio,
  Http,
}

/// Runtime server configuration, deserialised from `jobtrack.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_database_url")]
  pub database_url: String,
  #[serde(default)]
  pub transport:    Transport,
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  #[serde(default = "default_server_name")]
  pub server_name:  String,
}

fn default_database_url() -> String { "sqlite://jobtrack.db".to_owned() }
fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8765 }
fn default_server_name() -> String { "job-tracker-mcp".to_owned() }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      database_url: default_database_url(),
      transport:    Transport::default(),
      host:         default_host(),
      port:         default_port(),
      server_name:  default_server_name(),
    }
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
  pub database_url: Option<String>,
  pub transport:    Option<Transport>,
}

/// Load configuration from `file` and the process environment.
pub fn load_config(file: &Path, overrides: &ConfigOverrides) -> Result<ServerConfig, ConfigError> {
  load_config_from(file, std::env::vars().collect(), overrides)
}

/// Like [`load_config`], reading variables from `env` instead of the process.
/// A missing `file` is not an error.
pub fn load_config_from(
  file:      &Path,
  env:       Map<String, String>,
  overrides: &ConfigOverrides,
) -> Result<ServerConfig, ConfigError> {
  let mut builder = Config::builder();
  if let Some(url) = env.get("DATABASE_URL") {
    builder = builder.set_default("database_url", url.as_str())?;
  }

  builder
    .add_source(File::from(file.to_path_buf()).required(false))
    .add_source(Environment::with_prefix("JOBTRACK").source(Some(env)))
    .set_override_option("database_url", overrides.database_url.clone())?
    .set_override_option("transport", overrides.transport.map(|t| t.to_string()))?
    .build()?
    .try_deserialize()
}

/// Replace a leading `~/` with `home`. Other paths, or no `home`, pass
/// through untouched.
pub fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
  if let Ok(rest) = path.strip_prefix("~")
    && let Some(home) = home
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
